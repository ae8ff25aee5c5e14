//! Vocabulary filter
//!
//! Two independent checks gate every candidate template:
//!
//! 1. Cross-category terms: each category has jargon that only makes sense
//!    in its own vertical. A template written for a VPN site must never land
//!    on a hosting site, so a candidate is rejected when it contains another
//!    category's terms.
//! 2. Operational-complaint terms: support quality, fraud accusations,
//!    refund and legal vocabulary. Seed content must never assert claims
//!    that read as a factual or legal complaint, regardless of category.
//!
//! Both checks are case-sensitive substring matches against static lists,
//! exactly as the lists are authored. Pure and stateless.

use crate::store::records::Category;

const HOSTING_TERMS: &[&str] = &[
    "cPanel",
    "uptime guarantee",
    "shared hosting",
    "dedicated server",
    "nameserver",
    "site migration",
    "bandwidth cap",
];

const VPN_TERMS: &[&str] = &[
    "kill switch",
    "no-logs policy",
    "WireGuard",
    "OpenVPN",
    "server switching",
    "split tunneling",
    "IP leak",
];

const ANTIVIRUS_TERMS: &[&str] = &[
    "quarantine",
    "real-time protection",
    "malware signature",
    "false positive",
    "full system scan",
    "ransomware shield",
    "heuristic engine",
];

/// Terms that read as operational complaints, shared across categories
const COMPLAINT_TERMS: &[&str] = &[
    "refund",
    "chargeback",
    "scam",
    "scammed",
    "fraud",
    "rip-off",
    "lawsuit",
    "lawyer",
    "never responded",
    "no response from support",
    "stole my money",
    "class action",
];

/// True when `text` must not be posted for a site in `category`.
pub fn is_forbidden(text: &str, category: Category) -> bool {
    foreign_terms(category)
        .iter()
        .flat_map(|list| list.iter())
        .any(|term| text.contains(term))
        || COMPLAINT_TERMS.iter().any(|term| text.contains(term))
}

/// Term lists belonging to every category except `category`.
fn foreign_terms(category: Category) -> [&'static [&'static str]; 2] {
    match category {
        Category::Hosting => [VPN_TERMS, ANTIVIRUS_TERMS],
        Category::Vpn => [HOSTING_TERMS, ANTIVIRUS_TERMS],
        Category::Antivirus => [HOSTING_TERMS, VPN_TERMS],
    }
}
