use plandoc::{write_plan, write_plan_file, Error, PdfReader, PlanConfig, PLAN_BODY, PLAN_TITLE};

fn render(config: &PlanConfig) -> Vec<u8> {
    write_plan(config, Vec::new()).unwrap()
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn output_is_a_well_formed_pdf() {
    let bytes = render(&PlanConfig::default());
    assert!(bytes.starts_with(b"%PDF-1.7\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));

    let reader = PdfReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.pdf_version(), "1.7");
    assert!(reader.page_count() >= 1);
}

#[test]
fn plan_body_flows_over_multiple_pages() {
    let bytes = render(&PlanConfig::default());
    let reader = PdfReader::from_bytes(bytes).unwrap();
    // 128 segments at 7mm per line cannot fit one A4 page.
    assert!(reader.page_count() >= 2);
}

#[test]
fn title_appears_once_before_any_body_text() {
    let bytes = render(&PlanConfig::default());
    let reader = PdfReader::from_bytes(bytes).unwrap();
    let chunks = reader.text_chunks().unwrap();

    assert_eq!(chunks[0], PLAN_TITLE);
    let occurrences = chunks.iter().filter(|c| c.as_str() == PLAN_TITLE).count();
    assert_eq!(occurrences, 1);
}

#[test]
fn title_is_centered_bold_at_configured_size() {
    let bytes = render(&PlanConfig::default());
    let text = String::from_utf8_lossy(&bytes);
    // Bold 16pt font selected for the title cell.
    assert!(text.contains("/F2 16 Tf"));
    // Body resets to regular 12pt.
    assert!(text.contains("/F1 12 Tf"));
}

#[test]
fn body_lines_keep_their_order() {
    let bytes = render(&PlanConfig::default());
    let reader = PdfReader::from_bytes(bytes).unwrap();
    let text = reader.extract_text().unwrap();

    let roadmap = text.find("### Project Roadmap").unwrap();
    let modeling = text.find("#### 2. Predictive Modeling for Churn").unwrap();
    let next_steps = text.find("### Next Steps").unwrap();
    assert!(roadmap < modeling);
    assert!(modeling < next_steps);
}

#[test]
fn extracted_text_round_trips_after_whitespace_normalization() {
    let bytes = render(&PlanConfig::default());
    let reader = PdfReader::from_bytes(bytes).unwrap();
    let extracted = reader.extract_text().unwrap();

    let expected = format!("{} {}", PLAN_TITLE, PLAN_BODY);
    assert_eq!(normalize(&extracted), normalize(&expected));
}

#[test]
fn identical_runs_produce_identical_bytes() {
    let config = PlanConfig::default();
    assert_eq!(render(&config), render(&config));
}

#[test]
fn compressed_output_round_trips_too() {
    let config = PlanConfig {
        compress: true,
        ..Default::default()
    };
    let bytes = render(&config);
    assert!(bytes.len() < render(&PlanConfig::default()).len());

    let reader = PdfReader::from_bytes(bytes).unwrap();
    let extracted = reader.extract_text().unwrap();
    let expected = format!("{} {}", PLAN_TITLE, PLAN_BODY);
    assert_eq!(normalize(&extracted), normalize(&expected));
}

#[test]
fn write_plan_file_returns_the_path_written() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlanConfig {
        output_path: dir.path().join("plan.pdf"),
        ..Default::default()
    };

    let path = write_plan_file(&config).unwrap();
    assert_eq!(path, config.output_path);

    let reader = PdfReader::open(&path).unwrap();
    assert!(reader.page_count() >= 1);
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
}

#[test]
fn missing_directory_surfaces_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = PlanConfig {
        output_path: dir.path().join("no/such/dir/plan.pdf"),
        ..Default::default()
    };
    assert!(matches!(write_plan_file(&config), Err(Error::Io(_))));
}

#[test]
fn wider_margins_mean_more_pages() {
    let roomy = render(&PlanConfig::default());
    let tight = render(&PlanConfig {
        break_margin: 120.0,
        ..Default::default()
    });
    let roomy_pages = PdfReader::from_bytes(roomy).unwrap().page_count();
    let tight_pages = PdfReader::from_bytes(tight).unwrap().page_count();
    assert!(tight_pages > roomy_pages);
}
