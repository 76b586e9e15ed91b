//! Vendor registry: the ordered catalog of widget detection rules.
//!
//! Rules are tested in declaration order and the first matching rule wins.
//! When two patterns can match the same string only the earlier vendor is
//! ever reported, so reordering entries changes detection results.

use std::collections::HashSet;

use regex::{RegexBuilder, RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};

use crate::RegistryError;

/// Presentation metadata for a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorMeta {
    pub display_name: String,
    pub manufacturer: Option<String>,
    pub category: String,
}

/// A single detection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorRule {
    /// Unique short identifier, e.g. `"doctolib"`.
    pub key: String,
    /// Regular expression, matched case-insensitively.
    pub pattern: String,
    pub meta: Option<VendorMeta>,
}

impl VendorRule {
    #[must_use]
    pub fn new(key: &str, pattern: &str, meta: Option<VendorMeta>) -> Self {
        Self {
            key: key.to_string(),
            pattern: pattern.to_string(),
            meta,
        }
    }
}

/// Immutable, ordered set of vendor rules.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct VendorRegistry {
    rules: Vec<VendorRule>,
    patterns: RegexSet,
}

impl VendorRegistry {
    /// Build a registry from rules in their declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when a key is empty or duplicated, or when a
    /// pattern is empty or does not compile.
    pub fn new(rules: Vec<VendorRule>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if rule.key.trim().is_empty() {
                return Err(RegistryError::EmptyKey);
            }
            if !seen.insert(rule.key.as_str()) {
                return Err(RegistryError::DuplicateKey(rule.key.clone()));
            }
            if rule.pattern.trim().is_empty() {
                return Err(RegistryError::EmptyPattern(rule.key.clone()));
            }
            RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RegistryError::InvalidPattern {
                    key: rule.key.clone(),
                    source,
                })?;
        }

        let patterns = RegexSetBuilder::new(rules.iter().map(|r| r.pattern.as_str()))
            .case_insensitive(true)
            .build()
            .map_err(RegistryError::PatternSet)?;

        Ok(Self { rules, patterns })
    }

    /// The registry compiled from [`BUILTIN_VENDORS`].
    #[must_use]
    pub fn builtin() -> Self {
        let rules = BUILTIN_VENDORS
            .iter()
            .map(|v| {
                VendorRule::new(
                    v.key,
                    v.pattern,
                    Some(VendorMeta {
                        display_name: v.display_name.to_string(),
                        manufacturer: Some(v.manufacturer.to_string()),
                        category: v.category.to_string(),
                    }),
                )
            })
            .collect();
        Self::new(rules).expect("built-in vendor table is valid")
    }

    /// Return the key of the first rule (in declaration order) whose pattern
    /// matches `candidate`, or `None` for an empty candidate or no match.
    #[must_use]
    pub fn match_vendor(&self, candidate: &str) -> Option<&str> {
        if candidate.is_empty() {
            return None;
        }
        // SetMatches iterates indices in ascending order.
        let index = self.patterns.matches(candidate).iter().next()?;
        self.rules.get(index).map(|r| r.key.as_str())
    }

    /// Human-readable label for a vendor key.
    ///
    /// `"{display_name} ({category})"` when metadata exists, the bare key
    /// when it does not, and an empty string for `None`.
    #[must_use]
    pub fn display(&self, key: Option<&str>) -> String {
        let Some(key) = key else {
            return String::new();
        };
        match self.meta(key) {
            Some(meta) => format!("{} ({})", meta.display_name, meta.category),
            None => key.to_string(),
        }
    }

    #[must_use]
    pub fn rule(&self, key: &str) -> Option<&VendorRule> {
        self.rules.iter().find(|r| r.key == key)
    }

    #[must_use]
    pub fn meta(&self, key: &str) -> Option<&VendorMeta> {
        self.rule(key).and_then(|r| r.meta.as_ref())
    }

    #[must_use]
    pub fn rules(&self) -> &[VendorRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub struct BuiltinVendor {
    pub key: &'static str,
    pub pattern: &'static str,
    pub display_name: &'static str,
    pub manufacturer: &'static str,
    pub category: &'static str,
}

/// Built-in detection table. Order is significant: see the module docs.
pub const BUILTIN_VENDORS: &[BuiltinVendor] = &[
    // Terminbuchung
    BuiltinVendor {
        key: "doctolib",
        pattern: r"doctolib",
        display_name: "Doctolib",
        manufacturer: "Doctolib GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "jameda",
        pattern: r"jameda",
        display_name: "Jameda",
        manufacturer: "jameda GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "samedi",
        pattern: r"samedi\.(?:de|com)|samedi-widget",
        display_name: "samedi",
        manufacturer: "samedi GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "dr_flex",
        pattern: r"dr-flex\.de|drflex",
        display_name: "Dr. Flex",
        manufacturer: "Dr. Flex GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "etermin",
        pattern: r"etermin\.net",
        display_name: "eTermin",
        manufacturer: "eTermin GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "terminland",
        pattern: r"terminland\.(?:de|eu)",
        display_name: "Terminland",
        manufacturer: "Terminland GmbH",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "clickdoc",
        pattern: r"clickdoc\.(?:de|com)",
        display_name: "CLICKDOC",
        manufacturer: "CompuGroup Medical SE",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "doctena",
        pattern: r"doctena\.(?:de|com|lu|be|nl|ch|at)",
        display_name: "Doctena",
        manufacturer: "Doctena S.A.",
        category: "Terminbuchung",
    },
    BuiltinVendor {
        key: "calendly",
        pattern: r"calendly\.com",
        display_name: "Calendly",
        manufacturer: "Calendly LLC",
        category: "Terminbuchung",
    },
    // Bewertungen
    BuiltinVendor {
        key: "provenexpert",
        pattern: r"provenexpert\.(?:com|de|net)",
        display_name: "ProvenExpert",
        manufacturer: "Expert Systems AG",
        category: "Bewertungen",
    },
    BuiltinVendor {
        key: "trustpilot",
        pattern: r"trustpilot\.(?:com|net)",
        display_name: "Trustpilot",
        manufacturer: "Trustpilot A/S",
        category: "Bewertungen",
    },
    BuiltinVendor {
        key: "google_reviews",
        pattern: r"google\.[a-z.]+/maps|maps\.google\.|g\.page/|search\.google\.com/local/writereview",
        display_name: "Google Bewertungen",
        manufacturer: "Google LLC",
        category: "Bewertungen",
    },
    BuiltinVendor {
        key: "elfsight",
        pattern: r"elfsight(?:cdn)?\.com|elfsight-app",
        display_name: "Elfsight",
        manufacturer: "Elfsight LLC",
        category: "Bewertungen",
    },
    // Chat
    BuiltinVendor {
        key: "tawk",
        pattern: r"tawk\.to",
        display_name: "tawk.to",
        manufacturer: "tawk.to inc.",
        category: "Chat",
    },
    BuiltinVendor {
        key: "userlike",
        pattern: r"userlike(?:cdn)?\.(?:com|de)|userlikecdn",
        display_name: "Userlike",
        manufacturer: "Userlike UG",
        category: "Chat",
    },
    BuiltinVendor {
        key: "intercom",
        pattern: r"intercom(?:cdn)?\.(?:io|com)",
        display_name: "Intercom",
        manufacturer: "Intercom Inc.",
        category: "Chat",
    },
    BuiltinVendor {
        key: "crisp",
        pattern: r"crisp\.chat",
        display_name: "Crisp",
        manufacturer: "Crisp IM SAS",
        category: "Chat",
    },
    BuiltinVendor {
        key: "zendesk",
        pattern: r"zdassets\.com|zendesk\.com",
        display_name: "Zendesk",
        manufacturer: "Zendesk Inc.",
        category: "Chat",
    },
    BuiltinVendor {
        key: "whatsapp",
        pattern: r"wa\.me/|api\.whatsapp\.com",
        display_name: "WhatsApp",
        manufacturer: "Meta Platforms Inc.",
        category: "Chat",
    },
    // Analytics
    BuiltinVendor {
        key: "google_analytics",
        pattern: r"google-analytics\.com|googletagmanager\.com/gtag|\bgtag\b",
        display_name: "Google Analytics",
        manufacturer: "Google LLC",
        category: "Analytics",
    },
    BuiltinVendor {
        key: "google_tag_manager",
        pattern: r"googletagmanager\.com",
        display_name: "Google Tag Manager",
        manufacturer: "Google LLC",
        category: "Analytics",
    },
    BuiltinVendor {
        key: "matomo",
        pattern: r"matomo|piwik|\b_paq\b",
        display_name: "Matomo",
        manufacturer: "InnoCraft Ltd",
        category: "Analytics",
    },
    BuiltinVendor {
        key: "hotjar",
        pattern: r"hotjar",
        display_name: "Hotjar",
        manufacturer: "Hotjar Ltd",
        category: "Analytics",
    },
    BuiltinVendor {
        key: "meta_pixel",
        pattern: r"connect\.facebook\.net|\bfbq\b",
        display_name: "Meta Pixel",
        manufacturer: "Meta Platforms Inc.",
        category: "Analytics",
    },
    // Zahlung
    BuiltinVendor {
        key: "stripe",
        pattern: r"stripe\.(?:com|network)",
        display_name: "Stripe",
        manufacturer: "Stripe Inc.",
        category: "Zahlung",
    },
    BuiltinVendor {
        key: "paypal",
        pattern: r"paypal(?:objects)?\.(?:com|me)",
        display_name: "PayPal",
        manufacturer: "PayPal Holdings Inc.",
        category: "Zahlung",
    },
    BuiltinVendor {
        key: "klarna",
        pattern: r"klarna(?:services)?\.(?:com|net)",
        display_name: "Klarna",
        manufacturer: "Klarna Bank AB",
        category: "Zahlung",
    },
    BuiltinVendor {
        key: "mollie",
        pattern: r"mollie\.com",
        display_name: "Mollie",
        manufacturer: "Mollie B.V.",
        category: "Zahlung",
    },
];

#[cfg(test)]
#[path = "vendors_test.rs"]
mod tests;
