//! The party-section strategy: split at the 임대인/임차인 headings and pull
//! fields out of each section with targeted patterns.
//!
//! An alternate to the marker engine for templates that label the two party
//! blocks but not every individual field. It leans on the strong shapes
//! Korean identifiers have — a resident registration number is always
//! `dddddd-ddddddd`, a phone number `dd(d)-ddd(d)-dddd` — so fields can be
//! recognised by content where a label is missing or garbled.
//!
//! Less general than marker segmentation (it assumes exactly one landlord
//! block followed by one tenant block) and selected explicitly via the
//! CLI's `--strategy sectioned`. Output lands in the same sentinel-backed
//! [`ExtractionRecord`] shape as the marker engine, so consumers never care
//! which strategy ran.

use crate::error::ExtractError;
use crate::pipeline::normalize::normalize;
use crate::record::{ExtractionRecord, NO_INFO};
use crate::schema::{DottedPath, MarkerSchema};
use once_cell::sync::Lazy;
use regex::Regex;

/// Landlord heading, then everything up to the tenant heading, then the
/// rest. Lazy first group so the split lands on the *first* 임차인.
static RE_PARTY_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)임\s*대\s*인(.*?)임\s*차\s*인(.*)").unwrap());

/// The 대리인 heading; everything after it is the agent subsection.
static RE_AGENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"대\s*리\s*인").unwrap());

/// Resident registration number: 6 digits, dash, 7 digits.
static RE_REG_NO: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{6}-\d{7}").unwrap());

/// Phone number: 2–3 digits, 3–4 digits, 4 digits.
static RE_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{2,3}-\d{3,4}-\d{4}").unwrap());

/// Name: Hangul word following a (possibly spaced) 성명 label.
static RE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"성\s*명\s*[:：]?\s*([가-힣]+)").unwrap());

/// Address: Hangul/digit run following a (possibly spaced) 주소 label.
static RE_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"주\s*소\s*[:：]?\s*([가-힣\d\-\s]+)").unwrap());

/// Extract both party blocks into a sentinel-backed record.
///
/// When the text has no recognisable 임대인…임차인 structure the result is
/// all sentinels — same degradation contract as the marker engine.
pub fn extract_parties(text: &str, schema: &MarkerSchema) -> Result<ExtractionRecord, ExtractError> {
    let normalized = normalize(text);
    let mut record = ExtractionRecord::prefilled(schema);

    if let Some(caps) = RE_PARTY_SPLIT.captures(&normalized) {
        fill_party(&mut record, "landlord", &caps[1])?;
        fill_party(&mut record, "tenant", &caps[2])?;
    }

    Ok(record)
}

/// Fill one party block (and its agent subsection, when present).
fn fill_party(
    record: &mut ExtractionRecord,
    role: &str,
    section: &str,
) -> Result<(), ExtractError> {
    // The agent subsection would satisfy the same field patterns as the
    // party itself; split it off so party fields only see their own block.
    let (own, agent) = match RE_AGENT.find(section) {
        Some(m) => (&section[..m.start()], Some(&section[m.end()..])),
        None => (section, None),
    };

    set_field(record, role, "name", capture(&RE_NAME, own))?;
    set_field(record, role, "registrationNumber", find(&RE_REG_NO, own))?;
    set_field(record, role, "phone", find(&RE_PHONE, own))?;
    set_field(record, role, "address", capture(&RE_ADDRESS, own))?;

    if let Some(agent_section) = agent {
        let prefix = format!("{role}.agent");
        set_field(record, &prefix, "name", capture(&RE_NAME, agent_section))?;
        set_field(
            record,
            &prefix,
            "registrationNumber",
            find(&RE_REG_NO, agent_section),
        )?;
        set_field(record, &prefix, "address", capture(&RE_ADDRESS, agent_section))?;
    }

    Ok(())
}

/// First capture group of `re` in `text`, trimmed.
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Whole first match of `re` in `text`.
fn find(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

fn set_field(
    record: &mut ExtractionRecord,
    prefix: &str,
    field: &str,
    value: Option<String>,
) -> Result<(), ExtractError> {
    let path = DottedPath::parse(&format!("{prefix}.{field}"))
        .map_err(ExtractError::Schema)?;
    record.assign(&path, value.unwrap_or_else(|| NO_INFO.to_string()))?;
    Ok(())
}
