use serde::Deserialize;

/// Main configuration structure for Clinic-Probe
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) yields the stock crawl settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub scheduler: SchedulerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub keywords: KeywordConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

/// Per-target crawl budget and retry policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum pages fetched per target, seed page included
    pub max_pages: u32,

    /// Maximum link hops from the seed page
    pub max_depth: u32,

    /// Pause between consecutive fetches of one target (milliseconds)
    pub politeness_delay_ms: u64,

    /// Number of sub-page timeouts after which the whole target is abandoned
    pub max_timeout_retries: u32,

    /// Per-request timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 25,
            max_depth: 5,
            politeness_delay_ms: 200,
            max_timeout_retries: 3,
            request_timeout_ms: 10_000,
        }
    }
}

/// Batch-level concurrency settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SchedulerConfig {
    /// Number of targets crawled in parallel
    pub workers: u32,

    /// Wall-clock budget for the whole batch (seconds)
    pub deadline_secs: u64,

    /// Time granted to cancelled crawlers before they are aborted (seconds)
    pub shutdown_grace_secs: u64,

    /// Interval between progress reports (seconds)
    pub progress_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            deadline_secs: 20 * 60,
            shutdown_grace_secs: 60,
            progress_interval_secs: 5 * 60,
        }
    }
}

/// User agent sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}

/// Keyword sets driving link priority and scoring
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct KeywordConfig {
    /// Scanner indicators, 12 points each
    pub primary: Vec<String>,

    /// Digital dentistry indicators, 4 points each
    pub secondary: Vec<String>,

    /// Link keywords that raise crawl priority
    pub priority_pages: Vec<String>,

    /// Link keywords that veto a link outright
    pub excluded_pages: Vec<String>,

    /// Anchor-text suffixes marking non-HTML resources
    pub resource_extensions: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            primary: to_strings(DEFAULT_PRIMARY_KEYWORDS),
            secondary: to_strings(DEFAULT_SECONDARY_KEYWORDS),
            priority_pages: to_strings(DEFAULT_PRIORITY_PAGE_KEYWORDS),
            excluded_pages: to_strings(DEFAULT_EXCLUDED_PAGE_KEYWORDS),
            resource_extensions: to_strings(DEFAULT_RESOURCE_EXTENSIONS),
        }
    }
}

/// Input file settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// encoding_rs label of the input file
    pub encoding: String,

    /// Email value meaning "no email on record"
    pub placeholder: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            encoding: "EUC-KR".to_string(),
            placeholder: "X".to_string(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Appended to the input file stem to name the result file
    pub suffix: String,

    /// Optional markdown report path
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_3d_results".to_string(),
            summary_path: None,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub const DEFAULT_PRIMARY_KEYWORDS: &[&str] = &[
    "3d스캐너",
    "3d 스캐너",
    "3d scanning",
    "3d스캐닝",
    "3d 스캐닝",
    "쓰리디스캐너",
    "쓰리디 스캐너",
    "삼차원 스캐너",
    "구강스캐너",
    "intraoral scanner",
    "인트라오럴 스캐너",
    "광학스캐너",
    "optical scanner",
    "디지털인상",
    "digital impression",
    // brands
    "itero",
    "trios",
    "cerec",
    "carestream",
    "cs3600",
    "cs3700",
    "medit",
    "i500",
    "i700",
    "primescan",
    "sirona",
    "planmeca",
    "emerald",
    "3shape",
    "shining3d",
    "aoralscan",
    "dentapix",
    "launca",
    "virtuo vivo",
    // capture technology
    "confocal",
    "컨포컬",
    "structured light",
    "구조광",
    "triangulation",
    "삼각측량",
    "stereo camera",
    "스테레오카메라",
    // dental specific
    "dental scanner",
    "덴탈 스캐너",
    "치과용 스캐너",
    "치과 3d스캐너",
    "구강내 스캐너",
    "인상채득",
    "impression",
    "석고모형",
    "plaster model",
];

pub const DEFAULT_SECONDARY_KEYWORDS: &[&str] = &[
    "디지털치과",
    "디지털 치과",
    "digital dentistry",
    "스마트치과",
    "첨단장비",
    "최신장비",
    "하이테크",
    "디지털임플란트",
    "무인상",
    "인상없이",
    "편안한치료",
    "정밀진단",
    "cad/cam",
    "캐드캠",
    "cadcam",
    "워크플로우",
];

pub const DEFAULT_PRIORITY_PAGE_KEYWORDS: &[&str] = &[
    "장비",
    "equipment",
    "시설",
    "facility",
    "진료",
    "treatment",
    "소개",
    "about",
    "clinic",
    "technology",
    "tech",
    "digital",
    "임플란트",
    "implant",
    "진단",
    "diagnosis",
    "첨단",
    "advanced",
];

pub const DEFAULT_EXCLUDED_PAGE_KEYWORDS: &[&str] = &[
    "contact",
    "연락처",
    "오시는길",
    "location",
    "map",
    "sitemap",
    "privacy",
    "개인정보",
    "terms",
    "약관",
    "login",
    "admin",
    "board",
    "게시판",
    "notice",
    "공지",
    "news",
    "뉴스",
];

pub const DEFAULT_RESOURCE_EXTENSIONS: &[&str] =
    &[".jpg", ".jpeg", ".png", ".gif", ".pdf", ".doc", ".zip"];
