//! Fixed keyword dictionaries and title matching.

pub const TECH_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "chatgpt",
    "gpt",
    "openai",
    "claude",
    "gemini",
    "llm",
    "machine learning",
    "tech",
    "technology",
    "robot",
];

pub const TUTORIAL_KEYWORDS: &[&str] = &[
    "tutorial",
    "how to",
    "how-to",
    "guide",
    "learn",
    "step by step",
    "beginner",
    "course",
    "explained",
];

pub const NOVELTY_KEYWORDS: &[&str] = &["new", "latest", "just released", "first look"];

/// Tags that currently attract search traffic.
pub const TRENDING_TAG_KEYWORDS: &[&str] = &[
    "ai",
    "chatgpt",
    "automation",
    "productivity",
    "tutorial",
    "coding",
    "programming",
    "tech",
    "review",
    "nocode",
];

pub struct Theme {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub opportunity: &'static str,
}

pub const THEMES: &[Theme] = &[
    Theme {
        name: "AI & Technology",
        keywords: TECH_KEYWORDS,
        opportunity: "Cover the newest AI tools and releases while search interest is peaking",
    },
    Theme {
        name: "Educational",
        keywords: TUTORIAL_KEYWORDS,
        opportunity: "Turn the best-performing tutorials into a step-by-step series",
    },
    Theme {
        name: "Productivity",
        keywords: &["productivity", "workflow", "efficient", "hacks", "tips", "save time"],
        opportunity: "Package workflow tips into short, repeatable formats",
    },
    Theme {
        name: "Reviews & Comparisons",
        keywords: &["review", "vs", "versus", "comparison", "honest", "tested"],
        opportunity: "Publish honest head-to-head comparisons of the tools your audience already uses",
    },
    Theme {
        name: "News & Updates",
        keywords: &["news", "update", "released", "announced", "launch"],
        opportunity: "React quickly to announcements with concise update videos",
    },
];

/// A title prepared for keyword lookups.
#[derive(Debug, Clone)]
pub struct TitleText {
    padded: String,
    tokens: Vec<String>,
}

impl TitleText {
    pub fn new(title: &str) -> Self {
        let tokens = tokenize(title);
        let padded = format!(" {} ", tokens.join(" "));
        Self { padded, tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Multi-word keywords match as a phrase; single words match a whole token,
    /// or a token prefix when the keyword is at least five characters long.
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword_tokens = tokenize(keyword);
        match keyword_tokens.len() {
            0 => false,
            1 => {
                let word = &keyword_tokens[0];
                self.tokens.iter().any(|token| {
                    token == word || (word.len() >= 5 && token.starts_with(word.as_str()))
                })
            }
            _ => self
                .padded
                .contains(&format!(" {} ", keyword_tokens.join(" "))),
        }
    }

    pub fn matches_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| self.matches(keyword))
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|candidate| candidate == token)
    }
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
