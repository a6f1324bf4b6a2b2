//! Text-level pipeline tests.
//!
//! These run the header, cleaner and row stages through the public API on
//! page text shaped like a real two-page blood report. No pdfium needed.

use edgequake_labreport::export::{render_table, results_to_csv};
use edgequake_labreport::{
    parse_pages, parse_text, ExtractionConfig, LabReportError, PageText, RangeFlag,
};

const PAGE_ONE: &str = "Modern Pathology Lab
Name : Mr. Ravi Kumar
Age : 45
Gender : Male
Lab No. 473137934
*473137934*
COMPLETE BLOOD COUNT
Test Result Unit Reference
Hemoglobin 13.5 g/dL 13.0 - 17.0
Total Leucocyte Count 11500 cumm 4000 - 11000
Platelet Count 1.2 lakhs/cumm 1.5 - 4.1
Page 1 of 2";

const PAGE_TWO: &str = "Modern Pathology Lab
Name : Mr. Ravi Kumar
LIPID PROFILE
Cholesterol 180 mg/dL < 200
HDL Cholesterol 38 mg/dL > 40
HbA1c 5.6 % 4.0 - 5.6 %
Page 2 of 2";

fn two_page_report() -> Vec<PageText> {
    vec![PageText::new(1, PAGE_ONE), PageText::new(2, PAGE_TWO)]
}

#[test]
fn header_comes_from_first_page() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    assert_eq!(parsed.header.name.as_deref(), Some("Mr. Ravi Kumar"));
    assert_eq!(parsed.header.age.as_deref(), Some("45"));
    assert_eq!(parsed.header.gender.as_deref(), Some("Male"));
}

#[test]
fn rows_from_every_page_in_order() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    let names: Vec<&str> = parsed.results.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Hemoglobin",
            "Total Leucocyte Count",
            "Platelet Count",
            "Cholesterol",
            "HDL Cholesterol",
            "HbA1c",
        ]
    );

    let tlc = &parsed.results[1];
    assert_eq!(tlc.value, "11500");
    assert_eq!(tlc.unit, "cumm");
    assert_eq!(tlc.reference_range, "4000 - 11000");

    let hba1c = &parsed.results[5];
    assert_eq!(hba1c.unit, "%");
    assert_eq!(hba1c.reference_range, "4.0 - 5.6 %");
}

#[test]
fn flags_follow_reference_ranges() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    let flags: Vec<RangeFlag> = parsed.results.iter().map(|r| r.flag()).collect();
    assert_eq!(
        flags,
        vec![
            RangeFlag::Normal,
            RangeFlag::High,
            RangeFlag::Low,
            RangeFlag::Normal,
            RangeFlag::Low,
            RangeFlag::Normal,
        ]
    );
}

#[test]
fn noise_lines_are_counted() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    let stats = &parsed.stats;
    assert_eq!(stats.footer_lines, 2);
    assert_eq!(stats.barcode_lines, 1);
    // letterhead twice, patient name twice, lab number once
    assert_eq!(stats.boilerplate_lines, 5);
    assert_eq!(stats.rows_parsed, 6);
    assert_eq!(stats.pages_with_text, 2);
}

#[test]
fn marked_text_keeps_raw_page_text() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    let expected = format!("\n--- Page 1 ---\n{PAGE_ONE}\n--- Page 2 ---\n{PAGE_TWO}");
    assert_eq!(parsed.marked_text, expected);
}

#[test]
fn empty_middle_page_leaves_no_marker() {
    let pages = vec![
        PageText::new(1, PAGE_ONE),
        PageText::new(2, ""),
        PageText::new(3, PAGE_TWO),
    ];
    let parsed = parse_pages(&pages, &ExtractionConfig::default()).unwrap();
    assert!(!parsed.marked_text.contains("--- Page 2 ---"));
    assert!(parsed.marked_text.contains("\n--- Page 3 ---\n"));
    assert_eq!(parsed.results.len(), 6);
    assert_eq!(parsed.stats.empty_pages, 1);
}

#[test]
fn whitespace_page_still_gets_a_marker() {
    let pages = vec![
        PageText::new(1, PAGE_ONE),
        PageText::new(2, "  \n"),
        PageText::new(3, PAGE_TWO),
    ];
    let parsed = parse_pages(&pages, &ExtractionConfig::default()).unwrap();
    assert!(parsed.marked_text.contains("\n--- Page 2 ---\n  \n"));
    assert_eq!(parsed.results.len(), 6);
    assert_eq!(parsed.stats.empty_pages, 0);
    assert_eq!(parsed.stats.pages_with_text, 3);
}

#[test]
fn whitespace_first_page_is_still_searched_for_header() {
    let pages = vec![PageText::new(1, " \n"), PageText::new(2, PAGE_TWO)];
    let parsed = parse_pages(&pages, &ExtractionConfig::default()).unwrap();
    assert!(parsed.marked_text.starts_with("\n--- Page 1 ---\n \n"));
    assert_eq!(parsed.header.name, None);
}

#[test]
fn header_is_unknown_when_page_one_is_missing() {
    let pages = vec![PageText::new(2, PAGE_TWO)];
    let parsed = parse_pages(&pages, &ExtractionConfig::default()).unwrap();
    assert_eq!(parsed.header.name_or_unknown(), "Unknown");
    assert_eq!(parsed.header.age_or_unknown(), "Unknown");
    assert_eq!(parsed.results.len(), 3);
}

#[test]
fn custom_boilerplate_rules() {
    let text = "City Diagnostics Centre\nPatient ID 88 mg/dL 1\nSodium 140 mmol/L 135 - 145";

    let default = parse_text(text, &ExtractionConfig::default()).unwrap();
    assert_eq!(default.results.len(), 2);

    let config = ExtractionConfig::builder()
        .boilerplate_prefix("Patient ID")
        .boilerplate_marker("City Diagnostics")
        .build()
        .unwrap();
    let parsed = parse_text(text, &config).unwrap();
    assert_eq!(parsed.results.len(), 1);
    assert_eq!(parsed.results[0].test_name, "Sodium");
    assert_eq!(parsed.stats.boilerplate_lines, 2);
}

#[test]
fn custom_row_pattern() {
    let config = ExtractionConfig::builder()
        .row_pattern(r"^(?P<test>[^|]+)\|(?P<value>[^|]+)\|(?P<unit>[^|]+)(?:\|(?P<range>.*))?$")
        .build()
        .unwrap();
    let parsed = parse_text(
        "Sodium | 140 | mmol/L | 135 - 145\nPotassium | 5.9 | mmol/L | 3.5 - 5.1",
        &config,
    )
    .unwrap();
    assert_eq!(parsed.results.len(), 2);
    assert_eq!(parsed.results[1].flag(), RangeFlag::High);
}

#[test]
fn header_and_date_lines_are_not_rows() {
    let text = "Age : 42 Years\nCollected on 12 Jan\nHemoglobin 13.5 g/dL 13.0 - 17.0";
    let parsed = parse_text(text, &ExtractionConfig::default()).unwrap();
    assert_eq!(parsed.results.len(), 1);
    assert_eq!(parsed.results[0].test_name, "Hemoglobin");
}

#[test]
fn optional_range_admits_rows_without_a_range() {
    let text = "ESR 12 mm/hr\nHemoglobin 13.5 g/dL 13.0 - 17.0";

    let strict = parse_text(text, &ExtractionConfig::default()).unwrap();
    assert_eq!(strict.results.len(), 1);

    let config = ExtractionConfig::builder()
        .optional_range(true)
        .build()
        .unwrap();
    let lenient = parse_text(text, &config).unwrap();
    assert_eq!(lenient.results.len(), 2);
    assert_eq!(lenient.results[0].test_name, "ESR");
    assert_eq!(lenient.results[0].reference_range, "");
    assert_eq!(lenient.results[0].flag(), RangeFlag::Unknown);
}

#[test]
fn bad_row_pattern_is_a_config_error() {
    let err = ExtractionConfig::builder()
        .row_pattern(r"^(?P<test>.+) (?P<value>\d+)$")
        .build()
        .unwrap_err();
    assert!(matches!(err, LabReportError::InvalidConfig(_)));
}

#[test]
fn exports_render_the_parsed_rows() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();

    let table = render_table(&parsed.results, true);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[0].contains("Test Name"));
    assert!(lines[2].starts_with("1  Total Leucocyte Count"));
    assert!(lines[2].ends_with('H'));

    let csv = String::from_utf8(results_to_csv(&parsed.results).unwrap()).unwrap();
    assert_eq!(csv.lines().count(), 7);
    assert!(csv.contains("HDL Cholesterol,38,mg/dL,> 40,Low"));
}

#[test]
fn output_serialises_with_report_columns() {
    let parsed = parse_pages(&two_page_report(), &ExtractionConfig::default()).unwrap();
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["results"][0]["Test Name"], "Hemoglobin");
    assert_eq!(json["header"]["gender"], "Male");
}
