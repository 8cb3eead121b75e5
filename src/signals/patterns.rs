//! Surface forms of field identifiers, shared by the ROI and plausibility signals.

/// Domain synonyms for common job-sheet fields, keyed by identifier.
const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    (
        "customerSignature",
        &["signature", "sign here", "customer sign", "authorized by"],
    ),
    (
        "engineerSignature",
        &["engineer signature", "technician signature", "signed by"],
    ),
    (
        "jobReference",
        &["job ref", "job reference", "job no", "job number", "reference"],
    ),
    ("jobNumber", &["job no", "job number", "job ref"]),
    ("serviceDate", &["date of service", "service date", "date"]),
    ("visitDate", &["date of visit", "visit date", "date"]),
    ("customerName", &["customer", "client name", "name"]),
    ("siteAddress", &["site address", "address", "location"]),
    ("assetId", &["asset id", "asset no", "asset number", "equipment id"]),
    ("serialNumber", &["serial no", "serial number", "s n"]),
    (
        "workDescription",
        &["description of work", "work carried out", "work done", "description"],
    ),
    ("engineerName", &["engineer", "technician", "operative"]),
    ("timeIn", &["time in", "arrival time", "arrived"]),
    ("timeOut", &["time out", "departure time", "departed"]),
    ("invoiceNumber", &["invoice no", "invoice number", "invoice"]),
];

/// Splits camelCase, snake_case, kebab-case and dotted identifiers into lower-case words.
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in identifier.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
            continue;
        }

        if c.is_uppercase() && prev_lower_or_digit && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Candidate surface forms for `field`, deduplicated, in lookup order.
pub fn field_variants(field: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    };

    push(field.trim().to_lowercase());

    let words = split_words(field);
    push(words.join(" "));
    push(words.concat());

    if let Some((_, synonyms)) = FIELD_SYNONYMS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(field.trim()))
    {
        for synonym in *synonyms {
            push((*synonym).to_string());
        }
    }

    variants
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_camel_case() {
        assert_eq!(split_words("customerSignature"), vec!["customer", "signature"]);
        assert_eq!(split_words("assetID2"), vec!["asset", "id2"]);
    }

    #[test]
    fn test_split_words_separators() {
        assert_eq!(split_words("site_address"), vec!["site", "address"]);
        assert_eq!(split_words("time-in"), vec!["time", "in"]);
        assert_eq!(split_words("job.reference"), vec!["job", "reference"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_field_variants_with_synonyms() {
        let variants = field_variants("customerSignature");
        assert_eq!(
            variants,
            vec![
                "customersignature",
                "customer signature",
                "signature",
                "sign here",
                "customer sign",
                "authorized by",
            ]
        );
    }

    #[test]
    fn test_field_variants_unmapped_field() {
        let variants = field_variants("boilerPressure");
        assert_eq!(variants, vec!["boilerpressure", "boiler pressure"]);
    }

    #[test]
    fn test_field_variants_single_word() {
        assert_eq!(field_variants("Date"), vec!["date"]);
    }
}
