//! Prompt template for medical report summaries.

/// System message sent ahead of every report.
pub const SYSTEM_PROMPT: &str =
    "You are a medical assistant specialized in summarizing reports.";

/// Sections the model is asked to produce, in order. The model's output is not validated
/// against this list.
pub const REPORT_SECTIONS: [&str; 6] = [
    "Patient Overview",
    "Diagnoses",
    "Medical History Summary",
    "Doctor's Observations",
    "Doctor's Opinion",
    "Final Prognosis",
];

/// Embed the extracted report text into the user prompt.
pub fn build_report_prompt(report_text: &str) -> String {
    let mut prompt = String::from(
        "You are a medical assistant. Summarize the following medical report clearly and professionally:\n\n",
    );
    prompt.push_str(report_text);
    prompt.push_str("\n\nProvide the summary with the following structure:\n");
    for section in REPORT_SECTIONS {
        prompt.push_str("- ");
        prompt.push_str(section);
        prompt.push('\n');
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_before_sections() {
        let prompt = build_report_prompt("Patient John Doe, diagnosis: flu.");
        let text_at = prompt
            .find("Patient John Doe, diagnosis: flu.")
            .expect("report text embedded");

        let mut last = text_at;
        for section in REPORT_SECTIONS {
            let at = prompt.find(&format!("- {section}\n")).expect("section listed");
            assert!(at > last, "{section} out of order");
            last = at;
        }
    }

    #[test]
    fn prompt_keeps_long_input_intact() {
        let report = "x".repeat(200_000);
        assert!(build_report_prompt(&report).contains(&report));
    }
}
