use serde::Serialize;

pub const DEFAULT_LEVEL_ID: &str = "intermediate";

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Level {
    pub id: &'static str,
    pub label: &'static str,
    pub sublabel: &'static str,
    pub instructions: &'static str,
}

const LEVELS: &[Level] = &[
    Level {
        id: "beginner",
        label: "Beginner",
        sublabel: "A1-A2",
        instructions: "DIFFICULTY: Beginner (A1-A2).\n\
            - Use simple, everyday vocabulary and short, clear sentences (5-10 words).\n\
            - Speak slowly. Pause between sentences.\n\
            - Correct mistakes very gently with simple explanations.\n\
            - Give only 1 paraphrase variation and keep it simple.\n\
            - Use present tense primarily; introduce past tense gradually.\n\
            - Ask simple yes/no or choice questions.\n\
            - Avoid idioms, phrasal verbs, and complex grammar.\n\
            - Encourage any attempt to speak and celebrate small wins.",
    },
    Level {
        id: "intermediate",
        label: "Intermediate",
        sublabel: "B1-B2",
        instructions: "DIFFICULTY: Intermediate (B1-B2).\n\
            - Use natural, conversational vocabulary with some advanced words.\n\
            - Speak at a normal pace with varied sentence structures.\n\
            - Correct mistakes clearly and explain the grammar rule briefly.\n\
            - Give 2-3 paraphrase variations in different registers (casual/formal).\n\
            - Introduce idioms and phrasal verbs naturally, explaining them when used.\n\
            - Ask open-ended questions that require 2-3 sentence answers.\n\
            - Encourage the student to elaborate on their answers.",
    },
    Level {
        id: "advanced",
        label: "Advanced",
        sublabel: "C1-C2",
        instructions: "DIFFICULTY: Advanced (C1-C2).\n\
            - Use sophisticated vocabulary, idioms, and nuanced expressions freely.\n\
            - Speak at native speed with natural contractions.\n\
            - Focus corrections on nuance: connotation, collocation, tone.\n\
            - Give 3 paraphrase variations showing register differences.\n\
            - Challenge with complex topics and questions that require argumentation.\n\
            - Use advanced grammar: subjunctive, inversion, cleft sentences.\n\
            - Treat the student as a near-native speaker and be intellectually stimulating.",
    },
];

/// Look up a difficulty level, falling back to intermediate.
pub fn get_level(id: &str) -> &'static Level {
    LEVELS
        .iter()
        .find(|l| l.id == id)
        .or_else(|| LEVELS.iter().find(|l| l.id == DEFAULT_LEVEL_ID))
        .expect("default level exists")
}

pub fn is_valid_level(id: &str) -> bool {
    LEVELS.iter().any(|l| l.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_level_falls_back_to_intermediate() {
        assert_eq!(get_level("expert").id, "intermediate");
        assert_eq!(get_level("beginner").id, "beginner");
    }
}
