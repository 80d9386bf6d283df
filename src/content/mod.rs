pub mod characters;
pub mod levels;
pub mod scenarios;

pub use characters::{get_character, is_valid_character, Character, DEFAULT_CHARACTER_ID};
pub use levels::{get_level, is_valid_level, Level, DEFAULT_LEVEL_ID};
pub use scenarios::{get_scenario, Scenario};

const BASE_INSTRUCTIONS: &str = "You are a friendly English conversation teacher.\n\n\
CRITICAL - You MUST follow this format EVERY time the student speaks:\n\n\
STEP 1 - Grammar correction (if needed):\n\
- If there are mistakes, say: \"Just a small fix: [corrected sentence]\"\n\
- If perfect, say \"Perfect grammar!\"\n\n\
STEP 2 - Natural paraphrase variations (ALWAYS do this):\n\
- Give 2-3 more natural ways to say it, formatted as:\n\
  \"You could also say: [variation 1]\"\n\
  \"Or more naturally: [variation 2]\"\n\
  \"Another way: [variation 3]\"\n\n\
STEP 3 - Your response to continue the conversation.\n\n\
You must keep the response natural, encouraging, and concise.";

/// Assemble the full system instruction for a chat session: base
/// tutoring format, then the persona, the difficulty rules, and an
/// optional scenario focus. A scenario that names a registry entry
/// uses its curated instruction block; anything else is passed
/// through as free text.
pub fn compose_instruction(
    character: &Character,
    level: &Level,
    scenario: Option<&str>,
) -> String {
    let mut instruction = format!(
        "{}\n\nYou are {}, a friendly English conversation teacher. {}\n\n{}",
        BASE_INSTRUCTIONS, character.label, character.personality, level.instructions
    );
    if let Some(scenario) = scenario.map(str::trim).filter(|s| !s.is_empty()) {
        match get_scenario(scenario) {
            Some(entry) => {
                instruction.push_str("\n\n");
                instruction.push_str(entry.instructions);
            }
            None => {
                instruction.push_str("\n\nScenario focus: ");
                instruction.push_str(scenario);
            }
        }
    }
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_contains_persona_level_and_scenario() {
        let instruction = compose_instruction(
            get_character("ash"),
            get_level("beginner"),
            Some("ordering coffee"),
        );
        assert!(instruction.contains("You are Ash"));
        assert!(instruction.contains("DIFFICULTY: Beginner"));
        assert!(instruction.contains("Scenario focus: ordering coffee"));
    }

    #[test]
    fn registry_scenario_uses_curated_instructions() {
        let instruction = compose_instruction(
            get_character("ash"),
            get_level("intermediate"),
            Some("airport"),
        );
        assert!(instruction.contains("boarding pass"));
        assert!(!instruction.contains("Scenario focus"));
    }

    #[test]
    fn blank_scenario_is_omitted() {
        let instruction =
            compose_instruction(get_character("alloy"), get_level("advanced"), Some("   "));
        assert!(!instruction.contains("Scenario focus"));
    }
}
