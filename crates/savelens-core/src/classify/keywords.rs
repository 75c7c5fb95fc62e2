//! Curated vocabulary per category.

use crate::model::Category;

/// Keywords this short only match a whole token (optionally pluralised or
/// followed by digits), so that `hp` does not fire inside `ship`.
const SHORT_KEYWORD_LEN: usize = 3;

pub struct KeywordTable {
    pub category: Category,
    /// How distinctive the vocabulary is
    pub weight: f64,
    pub keywords: &'static [&'static str],
}

pub static KEYWORD_TABLES: &[KeywordTable] = &[
    KeywordTable {
        category: Category::Currency,
        weight: 0.9,
        keywords: &[
            "gold", "coin", "money", "cash", "credit", "wallet", "balance", "currency", "dollar",
            "silver", "buck", "funds", "zeny", "gil", "rupee",
        ],
    },
    KeywordTable {
        category: Category::PremiumCurrency,
        weight: 0.85,
        keywords: &[
            "gem", "diamond", "crystal", "token", "premium", "ruby", "jewel", "pearl", "emerald",
        ],
    },
    KeywordTable {
        category: Category::Experience,
        weight: 0.8,
        keywords: &["exp", "xp", "experience", "skill", "mastery", "rank", "knowledge"],
    },
    KeywordTable {
        category: Category::HealthEnergy,
        weight: 0.75,
        keywords: &[
            "health", "hp", "mana", "mp", "energy", "stamina", "life", "lives", "heart", "shield",
            "armor", "vitality",
        ],
    },
    KeywordTable {
        category: Category::Progress,
        weight: 0.75,
        keywords: &[
            "level", "lvl", "stage", "chapter", "world", "progress", "unlock", "checkpoint",
            "wave", "floor", "quest", "mission",
        ],
    },
    KeywordTable {
        category: Category::Inventory,
        weight: 0.7,
        keywords: &[
            "item", "inventory", "potion", "ammo", "bomb", "key", "ticket", "chest", "crate",
            "material", "resource", "wood", "stone",
        ],
    },
    KeywordTable {
        category: Category::Stats,
        weight: 0.65,
        keywords: &[
            "score", "highscore", "kill", "win", "loss", "attack", "defense", "strength", "speed",
            "power", "damage", "stat", "agility", "luck", "combo",
        ],
    },
    KeywordTable {
        category: Category::Achievements,
        weight: 0.6,
        keywords: &[
            "achievement", "trophy", "badge", "medal", "reward", "bonus", "award", "milestone",
        ],
    },
    KeywordTable {
        category: Category::Settings,
        weight: 0.55,
        keywords: &[
            "volume", "sound", "music", "sfx", "language", "quality", "sensitivity",
            "difficulty", "brightness", "vibration", "tutorial", "enabled", "setting", "option",
        ],
    },
    KeywordTable {
        category: Category::Relationships,
        weight: 0.55,
        keywords: &[
            "friend", "affinity", "affection", "trust", "reputation", "loyalty", "favor", "bond",
            "relationship",
        ],
    },
    KeywordTable {
        category: Category::Time,
        weight: 0.5,
        keywords: &[
            "time", "timer", "duration", "day", "hour", "minute", "second", "timestamp", "date",
            "cooldown", "playtime",
        ],
    },
];

/// Words in a path, section or file name that suggest game state
pub static CONTEXT_KEYWORDS: &[&str] = &[
    "player",
    "game",
    "save",
    "config",
    "profile",
    "user",
    "data",
    "stats",
    "progress",
    "character",
    "account",
    "inventory",
    "wallet",
];

/// Lowercase with separators removed: `Player_Gold` -> `playergold`
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '_' | '-' | '.' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split on separators and camelCase boundaries, lowercased.
pub fn tokens(key: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in key.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn token_matches(token: &str, keyword: &str) -> bool {
    let Some(rest) = token.strip_prefix(keyword) else {
        return false;
    };
    rest.is_empty() || rest == "s" || rest.chars().all(|c| c.is_ascii_digit())
}

/// Whether `keyword` occurs in a key given its normalized form and tokens
pub fn keyword_matches(normalized: &str, tokens: &[String], keyword: &str) -> bool {
    if keyword.len() <= SHORT_KEYWORD_LEN {
        tokens.iter().any(|token| token_matches(token, keyword))
    } else {
        normalized.contains(keyword)
    }
}

/// Per category: number of distinct keywords that matched
pub fn keyword_hits(key: &str) -> Vec<(&'static KeywordTable, usize)> {
    let normalized = normalize_key(key);
    let tokens = tokens(key);
    KEYWORD_TABLES
        .iter()
        .filter_map(|table| {
            let hits = table
                .keywords
                .iter()
                .filter(|keyword| keyword_matches(&normalized, &tokens, keyword))
                .count();
            (hits > 0).then_some((table, hits))
        })
        .collect()
}

pub fn context_hits(context: &str) -> usize {
    let lower = context.to_lowercase();
    CONTEXT_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
}
