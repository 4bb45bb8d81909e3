//! Input file to result file, through the real fetcher and scheduler

use clinic_probe::config::load_config_with_hash;
use clinic_probe::crawler::{BatchScheduler, HttpFetcher, SiteCrawler};
use clinic_probe::input::read_input;
use clinic_probe::output::{
    default_output_path, format_markdown_report, BatchReport, BatchSummary, CsvOutput,
    OutputHandler,
};
use chrono::Utc;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG: &str = r#"
[crawler]
max-pages = 5
politeness-delay-ms = 0

[scheduler]
workers = 3
deadline-secs = 60

[output]
suffix = "_checked"
"#;

#[tokio::test]
async fn test_euc_kr_input_to_result_csv() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    "<html><body>구강스캐너 트리오스 도입, 디지털 치과 진료, 3Shape TRIOS, iTero</body></html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();

    let config_path = dir.path().join("probe.toml");
    fs::write(&config_path, CONFIG).unwrap();
    let (config, hash) = load_config_with_hash(&config_path).unwrap();
    assert_eq!(config.crawler.max_pages, 5);

    let csv = format!(
        "치과명,홈페이지,이메일,지역\n\
         스마일치과,{},smile@clinic.kr,서울\n\
         이메일없는치과,,X,부산\n\
         메일만치과,,mail@clinic.kr,대구\n",
        server.uri()
    );
    let (bytes, _, _) = encoding_rs::EUC_KR.encode(&csv);
    let input_path = dir.path().join("clinics.csv");
    fs::write(&input_path, &bytes).unwrap();

    let table = read_input(&input_path, &config.input).unwrap();
    let targets = table.targets(&config.input.placeholder);
    assert_eq!(targets.len(), 2);

    let fetcher = HttpFetcher::new(&config).unwrap();
    let config = Arc::new(config);
    let crawler = SiteCrawler::new(Arc::new(fetcher), config.clone());
    let scheduler = BatchScheduler::new(crawler, &config.scheduler);

    let started = Utc::now();
    let results = scheduler.run(targets).await;
    let summary = BatchSummary::from_results(&results, table.rows.len(), started, Utc::now())
        .with_config_hash(hash.clone());

    let report = BatchReport {
        table: &table,
        results: &results,
        summary: &summary,
        placeholder: &config.input.placeholder,
    };

    let output_path = default_output_path(&input_path, &config.output.suffix);
    assert_eq!(output_path, dir.path().join("clinics_checked.csv"));
    CsvOutput::new(&output_path).write_report(&report).unwrap();

    let written = fs::read(&output_path).unwrap();
    assert!(written.starts_with(b"\xEF\xBB\xBF"));

    let text = String::from_utf8(written[3..].to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "치과명,홈페이지,이메일,지역,has_equipment,confidence,score,evidence,status,error"
    );

    // 구강스캐너, itero, trios, 3shape + 디지털 치과
    let smile: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(smile[0], "스마일치과");
    assert_eq!(smile[4], "yes");
    assert_eq!(smile[5], "HIGH");
    assert_eq!(smile[6], "52");
    assert!(lines[1].ends_with(",found,"));

    assert_eq!(
        lines[2],
        "이메일없는치과,,X,부산,skipped,SKIP,0,no website or email,skipped,"
    );
    assert_eq!(
        lines[3],
        "메일만치과,,mail@clinic.kr,대구,no,NONE,0,no website,not found,"
    );

    let markdown = format_markdown_report(&report);
    assert!(markdown.contains(&hash));
    assert!(markdown.contains("스마일치과"));
}
