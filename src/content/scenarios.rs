use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub category: &'static str,
    pub instructions: &'static str,
}

const SCENARIOS: &[Scenario] = &[
    // Travel
    Scenario {
        id: "airport",
        label: "Airport",
        emoji: "✈️",
        category: "travel",
        instructions: "Focus on airport vocabulary and situations: check-in, security \
            screening, boarding, baggage claim, flight delays. Use common airport phrases \
            and help practice realistic airport conversations. Include vocabulary like \
            \"boarding pass\", \"gate\", \"terminal\", \"customs\", \"departure\".",
    },
    Scenario {
        id: "hotel",
        label: "Hotel",
        emoji: "🏨",
        category: "travel",
        instructions: "Focus on hotel situations: checking in/out, room service, \
            amenities, complaints, requests. Practice making reservations, asking about \
            facilities, reporting issues. Include vocabulary like \"reservation\", \
            \"check-in\", \"room key\", \"amenities\", \"housekeeping\".",
    },
    Scenario {
        id: "tourist",
        label: "Sightseeing",
        emoji: "🗺️",
        category: "travel",
        instructions: "Focus on tourist activities: asking for directions, buying \
            tickets, visiting attractions, taking tours. Practice questions about \
            locations, prices, opening hours. Include vocabulary like \"attraction\", \
            \"landmark\", \"guided tour\", \"admission fee\", \"directions\".",
    },
    // Business
    Scenario {
        id: "interview",
        label: "Job Interview",
        emoji: "💼",
        category: "business",
        instructions: "Focus on job interview situations: self-introduction, answering \
            behavioral questions, discussing experience and skills, asking about the \
            role. Practice professional language and common interview questions. Include \
            vocabulary like \"qualifications\", \"responsibilities\", \"teamwork\", \
            \"achievement\", \"career goals\".",
    },
    Scenario {
        id: "meeting",
        label: "Meeting",
        emoji: "📊",
        category: "business",
        instructions: "Focus on business meeting situations: presenting ideas, \
            agreeing/disagreeing professionally, making suggestions, asking for \
            clarification. Practice formal business communication. Include vocabulary \
            like \"agenda\", \"proposal\", \"deadline\", \"strategy\", \"follow-up\".",
    },
    Scenario {
        id: "presentation",
        label: "Presentation",
        emoji: "📈",
        category: "business",
        instructions: "Focus on presentation skills: introducing topics, transitioning \
            between points, emphasizing key information, handling Q&A. Practice clear, \
            confident delivery. Include vocabulary like \"overview\", \"highlight\", \
            \"data shows\", \"in conclusion\", \"any questions\".",
    },
    Scenario {
        id: "networking",
        label: "Networking",
        emoji: "🤝",
        category: "business",
        instructions: "Focus on professional networking: introducing yourself, \
            exchanging business cards, making small talk, following up. Practice polite, \
            professional conversation starters. Include vocabulary like \"industry\", \
            \"background\", \"connect\", \"opportunity\", \"collaboration\".",
    },
    // Daily life
    Scenario {
        id: "restaurant",
        label: "Restaurant",
        emoji: "🍽️",
        category: "daily",
        instructions: "Focus on restaurant situations: making reservations, ordering \
            food, asking about menu items, requesting changes, paying the bill. Practice \
            polite requests and food vocabulary. Include vocabulary like \"appetizer\", \
            \"main course\", \"allergy\", \"bill\", \"tip\".",
    },
    Scenario {
        id: "shopping",
        label: "Shopping",
        emoji: "🛍️",
        category: "daily",
        instructions: "Focus on shopping situations: asking about products, trying \
            things on, comparing prices, returns/exchanges. Practice making purchases \
            and handling issues. Include vocabulary like \"size\", \"color\", \
            \"discount\", \"receipt\", \"refund\", \"exchange\".",
    },
    Scenario {
        id: "medical",
        label: "Hospital",
        emoji: "🏥",
        category: "daily",
        instructions: "Focus on medical situations: describing symptoms, making \
            appointments, understanding prescriptions, asking about treatment. Practice \
            health-related vocabulary clearly. Include vocabulary like \"symptoms\", \
            \"appointment\", \"prescription\", \"medication\", \"insurance\".",
    },
    Scenario {
        id: "bank",
        label: "Bank",
        emoji: "🏦",
        category: "daily",
        instructions: "Focus on banking situations: opening accounts, making \
            transactions, asking about services, resolving issues. Practice financial \
            vocabulary. Include vocabulary like \"account\", \"transfer\", \"balance\", \
            \"deposit\", \"withdrawal\", \"interest rate\".",
    },
    // Social
    Scenario {
        id: "introduction",
        label: "Introductions",
        emoji: "👋",
        category: "social",
        instructions: "Focus on introductions and greetings: meeting new people, \
            introducing yourself and others, starting conversations. Practice friendly, \
            natural introductions. Include vocabulary like \"nice to meet you\", \
            \"background\", \"interests\", \"where are you from\", \"what do you do\".",
    },
    Scenario {
        id: "hobbies",
        label: "Hobbies",
        emoji: "🎸",
        category: "social",
        instructions: "Focus on talking about hobbies and interests: discussing \
            activities you enjoy, sharing experiences, making plans. Practice expressing \
            preferences and enthusiasm. Include vocabulary like \"passionate about\", \
            \"in my free time\", \"I enjoy\", \"recently started\", \"favorite activity\".",
    },
    Scenario {
        id: "opinions",
        label: "Sharing Opinions",
        emoji: "💭",
        category: "social",
        instructions: "Focus on expressing and discussing opinions: stating your views, \
            agreeing/disagreeing politely, giving reasons, asking for others' opinions. \
            Practice persuasive yet respectful communication. Include vocabulary like \
            \"I think\", \"in my opinion\", \"I agree/disagree\", \"on the other hand\", \
            \"that's a good point\".",
    },
    Scenario {
        id: "smalltalk",
        label: "Small Talk",
        emoji: "☕",
        category: "social",
        instructions: "Focus on casual small talk: weather, weekend plans, recent \
            events, current activities. Practice natural, friendly conversation. Include \
            vocabulary like \"how was your weekend\", \"the weather\", \"plans for\", \
            \"recently\", \"by the way\".",
    },
];

/// Look up a practice scenario. Unlike characters and levels there is
/// no default: an unknown id means the client sent free text instead.
pub fn get_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}

pub fn all_scenarios() -> &'static [Scenario] {
    SCENARIOS
}
