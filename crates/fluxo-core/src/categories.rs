//! Merchant-keyword category prediction
//!
//! Blank category fields on transaction rows are filled by scanning the
//! description against a keyword table. Matching runs an ordered list of
//! scoring strategies and combines them with a fixed ensemble rule:
//!
//! 1. every strategy nominates its first matching rule, in rule declaration
//!    order, with the strategy's base score;
//! 2. candidates whose category is nominated by more than one strategy get
//!    a fixed agreement boost;
//! 3. the highest score wins; ties fall to the strategy declared first.
//!
//! Rules are declared most-specific first ("uber eats" before "uber"), so
//! declaration order doubles as the specificity tie-break. The catalog is
//! built once at startup and passed by reference into the transformer;
//! there is no global mutable state.

use regex::Regex;
use tracing::debug;

/// Score awarded by the whole-word strategy.
const WORD_MATCH_SCORE: f64 = 1.0;
/// Score awarded by the substring strategy.
const SUBSTRING_MATCH_SCORE: f64 = 0.6;
/// Added when two strategies agree on the same category.
const AGREEMENT_BOOST: f64 = 0.25;
/// Substring matching ignores very short keywords ("bp" would hit "bpi").
const SUBSTRING_MIN_KEYWORD_LEN: usize = 4;

/// One keyword mapped to the three-level category hierarchy.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub keyword: String,
    pub major: String,
    pub category: String,
    pub sub_category: String,
    word_pattern: Regex,
}

impl CategoryRule {
    fn new(keyword: &str, major: &str, category: &str, sub_category: &str) -> Self {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
        Self {
            keyword: keyword.to_string(),
            major: major.to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            word_pattern: Regex::new(&pattern).expect("keyword pattern is valid"),
        }
    }
}

/// A winning prediction for one description.
#[derive(Debug, Clone)]
pub struct CategoryGuess {
    pub keyword: String,
    pub major: String,
    pub category: String,
    pub sub_category: String,
    pub score: f64,
    pub strategy: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    WholeWord,
    Substring,
}

impl Strategy {
    /// Declaration order is the tie-break order.
    const ALL: [Strategy; 2] = [Strategy::WholeWord, Strategy::Substring];

    fn name(&self) -> &'static str {
        match self {
            Strategy::WholeWord => "whole_word",
            Strategy::Substring => "substring",
        }
    }

    fn base_score(&self) -> f64 {
        match self {
            Strategy::WholeWord => WORD_MATCH_SCORE,
            Strategy::Substring => SUBSTRING_MATCH_SCORE,
        }
    }

    fn matches(&self, description_lower: &str, rule: &CategoryRule) -> bool {
        match self {
            Strategy::WholeWord => rule.word_pattern.is_match(description_lower),
            Strategy::Substring => {
                rule.keyword.len() >= SUBSTRING_MIN_KEYWORD_LEN
                    && description_lower.contains(&rule.keyword)
            }
        }
    }
}

/// Keyword table plus the fixed origin vocabulary, built once per process.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    rules: Vec<CategoryRule>,
    origin_vocabulary: Vec<String>,
}

impl KeywordCatalog {
    /// The built-in merchant table. Most-specific keywords come first so
    /// declaration order resolves overlaps ("uber eats" vs "uber").
    pub fn builtin() -> Self {
        let rules = vec![
            CategoryRule::new("uber eats", "Food", "Restaurants", "Delivery"),
            CategoryRule::new("pingo doce", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("leroy merlin", "Housing", "Home", "DIY"),
            CategoryRule::new("burger king", "Food", "Restaurants", "Fast Food"),
            CategoryRule::new("galp", "Transport", "Fuel", "Car"),
            CategoryRule::new("bp", "Transport", "Fuel", "Car"),
            CategoryRule::new("repsol", "Transport", "Fuel", "Car"),
            CategoryRule::new("uber", "Transport", "Taxi", "Ride Hailing"),
            CategoryRule::new("bolt", "Transport", "Taxi", "Ride Hailing"),
            CategoryRule::new("continente", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("lidl", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("aldi", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("auchan", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("intermarche", "Food", "Groceries", "Supermarket"),
            CategoryRule::new("mcdonald", "Food", "Restaurants", "Fast Food"),
            CategoryRule::new("netflix", "Leisure", "Streaming", "Video"),
            CategoryRule::new("hbo", "Leisure", "Streaming", "Video"),
            CategoryRule::new("spotify", "Leisure", "Streaming", "Music"),
            CategoryRule::new("edp", "Housing", "Utilities", "Electricity"),
            CategoryRule::new("aguas", "Housing", "Utilities", "Water"),
            CategoryRule::new("meo", "Housing", "Utilities", "Telecom"),
            CategoryRule::new("vodafone", "Housing", "Utilities", "Telecom"),
            CategoryRule::new("farmacia", "Health", "Pharmacy", "Medication"),
            CategoryRule::new("wells", "Health", "Pharmacy", "Medication"),
            CategoryRule::new("ikea", "Housing", "Home", "Furniture"),
            CategoryRule::new("zara", "Personal", "Clothing", "Apparel"),
            CategoryRule::new("decathlon", "Leisure", "Sports", "Equipment"),
            CategoryRule::new("salario", "Income", "Salary", "Employer"),
        ];

        let origin_vocabulary = vec![
            "Comum".to_string(),
            "Pessoal".to_string(),
            "Partilhado".to_string(),
        ];

        Self {
            rules,
            origin_vocabulary,
        }
    }

    /// Canonicalize an origin name: title-case, snapping to the fixed
    /// vocabulary when the name matches it case-insensitively.
    pub fn canonical_origin(&self, raw: &str) -> String {
        let cased = title_case(raw.trim());
        for known in &self.origin_vocabulary {
            if known.eq_ignore_ascii_case(&cased) {
                return known.clone();
            }
        }
        cased
    }

    /// Run the strategy ensemble over one description.
    pub fn predict(&self, description: &str) -> Option<CategoryGuess> {
        let lower = description.to_lowercase();

        // Each strategy nominates its first matching rule.
        let mut candidates: Vec<CategoryGuess> = Vec::new();
        for strategy in Strategy::ALL {
            if let Some(rule) = self.rules.iter().find(|r| strategy.matches(&lower, r)) {
                candidates.push(CategoryGuess {
                    keyword: rule.keyword.clone(),
                    major: rule.major.clone(),
                    category: rule.category.clone(),
                    sub_category: rule.sub_category.clone(),
                    score: strategy.base_score(),
                    strategy: strategy.name(),
                });
            }
        }

        if candidates.is_empty() {
            return None;
        }

        // Same-category agreement boost across strategies.
        for i in 0..candidates.len() {
            let agreeing = candidates
                .iter()
                .filter(|c| c.category == candidates[i].category)
                .count();
            if agreeing > 1 {
                candidates[i].score += AGREEMENT_BOOST;
            }
        }

        // Highest score wins; ties fall to strategy declaration order, which
        // is the order candidates were pushed.
        let winner = candidates
            .into_iter()
            .reduce(|best, c| if c.score > best.score { c } else { best })?;

        debug!(
            "Predicted {}/{}/{} from keyword '{}' ({} strategy, score {:.2})",
            winner.major, winner.category, winner.sub_category, winner.keyword, winner.strategy, winner.score
        );
        Some(winner)
    }
}

/// Uppercase the first letter of each word, lowercase the rest.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + chars.as_str().to_lowercase().as_str()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
