use std::fmt::Write as _;

use super::super::domain::{Comp, MainProperty, PropertyDetails, UNKNOWN};

pub(crate) const SYSTEM_PROMPT: &str = "You are an experienced residential real estate appraiser. \
Ground every estimate in the comparable sales you are given, call out material differences \
between the subject property and each comp, and answer with a single dollar figure.";

const NONE: &str = "None";

/// Renders the valuation context handed to the generation provider.
pub(crate) fn build_valuation_prompt(main: &MainProperty, comps: &[Comp]) -> String {
    let mut prompt = String::new();

    writeln!(
        &mut prompt,
        "Estimate the After Repair Value (ARV) for the following property based on the provided validated comparable sales (comps)."
    )
    .expect("write instructions");
    prompt.push('\n');

    writeln!(&mut prompt, "Main Property:").expect("write subject heading");
    writeln!(&mut prompt, "- Address: {}", main.address).expect("write address");
    writeln!(&mut prompt, "- Bedrooms: {}", main.bedrooms).expect("write bedrooms");
    writeln!(&mut prompt, "- Bathrooms: {}", main.bathrooms).expect("write bathrooms");
    writeln!(&mut prompt, "- Square Footage: {}", main.square_footage)
        .expect("write square footage");
    write_details(&mut prompt, "- ", Some(&main.details));
    prompt.push('\n');

    writeln!(&mut prompt, "Validated Comps:").expect("write comps heading");
    if comps.is_empty() {
        writeln!(&mut prompt, "{NONE}").expect("write empty comps");
    }
    for comp in comps {
        writeln!(&mut prompt, "- Address: {}", comp.address).expect("write comp address");
        writeln!(&mut prompt, "  - Sale Price: {}", format_price(comp.sale_price()))
            .expect("write sale price");
        write_details(&mut prompt, "  - ", comp.details.as_ref());
    }
    prompt.push('\n');

    writeln!(
        &mut prompt,
        "Analyze the similarities and differences to provide a single estimated ARV value in dollars and a brief explanation."
    )
    .expect("write closing instructions");

    prompt
}

fn write_details(prompt: &mut String, bullet: &str, details: Option<&PropertyDetails>) {
    match details {
        Some(details) => write_attributes(prompt, bullet, details),
        None => writeln!(prompt, "{bullet}Details: {NONE}").expect("write missing details"),
    }
    // Free-text page content is not forwarded to the provider.
    writeln!(prompt, "{bullet}Additional Details: {NONE}").expect("write additional details");
}

fn write_attributes(prompt: &mut String, bullet: &str, details: &PropertyDetails) {
    writeln!(prompt, "{bullet}Neighborhood: {}", text_or_unknown(&details.neighborhood))
        .expect("write neighborhood");
    writeln!(
        prompt,
        "{bullet}Has Pool: {}",
        if details.has_pool { "Yes" } else { "No" }
    )
    .expect("write pool");
    if details.lot_size > 0.0 {
        writeln!(prompt, "{bullet}Lot Size: {} sqft", details.lot_size).expect("write lot size");
    } else {
        writeln!(prompt, "{bullet}Lot Size: {UNKNOWN}").expect("write lot size");
    }
    if details.year_built > 0 {
        writeln!(prompt, "{bullet}Year Built: {}", details.year_built).expect("write year built");
    } else {
        writeln!(prompt, "{bullet}Year Built: {UNKNOWN}").expect("write year built");
    }
    writeln!(prompt, "{bullet}Condition: {}", text_or_unknown(&details.condition))
        .expect("write condition");
}

fn text_or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        UNKNOWN
    } else {
        value
    }
}

fn format_price(price: f64) -> String {
    if price > 0.0 {
        format!("${price}")
    } else {
        "N/A".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> MainProperty {
        MainProperty {
            address: "1 Main St".to_string(),
            bedrooms: 3.0,
            bathrooms: 2.5,
            square_footage: 1500.0,
            detail_url: None,
            details: PropertyDetails {
                neighborhood: "Elm".to_string(),
                has_pool: false,
                lot_size: 5000.0,
                year_built: 1990,
                condition: "Good".to_string(),
            },
        }
    }

    #[test]
    fn prompt_lists_subject_and_comp_attributes() {
        let comp = Comp::new("2 Main St", "https://listings.example/2", 300000.0)
            .with_details(subject().details);
        let prompt = build_valuation_prompt(&subject(), &[comp]);

        assert!(prompt.contains("- Address: 1 Main St"));
        assert!(prompt.contains("- Bathrooms: 2.5"));
        assert!(prompt.contains("- Lot Size: 5000 sqft"));
        assert!(prompt.contains("- Address: 2 Main St"));
        assert!(prompt.contains("  - Sale Price: $300000"));
        assert!(prompt.contains("  - Year Built: 1990"));
    }

    #[test]
    fn placeholder_details_render_as_unknown() {
        let comp = Comp::new("9 Pine Rd", "https://listings.example/9", 250000.0)
            .with_details(PropertyDetails::placeholder());
        let prompt = build_valuation_prompt(&subject(), &[comp]);

        assert!(prompt.contains("  - Neighborhood: Unknown"));
        assert!(prompt.contains("  - Lot Size: Unknown"));
        assert!(prompt.contains("  - Year Built: Unknown"));
        assert!(prompt.contains("  - Has Pool: No"));
    }

    #[test]
    fn comps_without_details_are_marked_none() {
        let comp = Comp::new("4 Birch Ln", "https://listings.example/4", 199000.0);
        let prompt = build_valuation_prompt(&subject(), &[comp]);
        assert!(prompt.contains("  - Details: None"));
        assert!(prompt.contains("  - Additional Details: None"));
    }

    #[test]
    fn subject_and_every_comp_carry_additional_details_line() {
        let comps = [
            Comp::new("2 Main St", "https://listings.example/2", 300000.0)
                .with_details(subject().details),
            Comp::new("9 Pine Rd", "https://listings.example/9", 250000.0)
                .with_details(PropertyDetails::placeholder()),
        ];
        let prompt = build_valuation_prompt(&subject(), &comps);

        assert!(prompt.contains("\n- Additional Details: None\n"));
        assert_eq!(prompt.matches("  - Additional Details: None").count(), 2);
    }
}
