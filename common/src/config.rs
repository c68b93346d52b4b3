use anyhow::Result;
use constcat::concat;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, instrument};

// local storage
//
// the pages share a single per-origin key; the prefix is kept separate so that any future
// preference lands in the same namespace
pub const STORAGE_PREFIX: &str = "resume-";
pub const THEME_STORAGE_KEY: &str = concat!(STORAGE_PREFIX, "theme");

// folio configuration
//
// every timing and threshold used by the page features.  the webapp embeds site.toml at
// build time; any section (or field) left out falls back to the defaults below
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub theme: ThemeConfig,
    pub reveal: RevealConfig,
    pub skills: SkillConfig,
    pub filter: FilterConfig,
    pub typing: TypingConfig,
    pub form: FormConfig,
    pub nav: NavConfig,
    pub print: PrintConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    // how long the body keeps its css transition after a toggle
    pub transition_ms: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            storage_key: THEME_STORAGE_KEY.to_owned(),
            transition_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    pub threshold: f64,
    pub root_margin: String,
    pub stagger_ms: u32,
    pub child_stagger_ms: u32,
    pub float_delay_ms: u32,

    // the second, more sensitive observer for "flowing" elements
    pub flow_threshold: f64,
    pub flow_root_margin: String,
    pub flow_max_delay_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        RevealConfig {
            threshold: 0.15,
            root_margin: String::from("0px 0px -100px 0px"),
            stagger_ms: 100,
            child_stagger_ms: 150,
            float_delay_ms: 800,
            flow_threshold: 0.3,
            flow_root_margin: String::from("0px 0px -50px 0px"),
            flow_max_delay_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct SkillConfig {
    pub threshold: f64,
    pub delay_ms: u32,
}

impl Default for SkillConfig {
    fn default() -> Self {
        SkillConfig {
            threshold: 0.5,
            delay_ms: 200,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub stagger_ms: u32,
    pub fade_out_ms: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            stagger_ms: 100,
            fade_out_ms: 300,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TypingConfig {
    // the cycling loop only takes over elements whose markup already contains this text
    pub trigger: String,
    pub phrases: Vec<String>,
    pub type_ms: u32,
    pub delete_ms: u32,
    pub hold_ms: u32,
    pub next_phrase_ms: u32,

    // one-shot reveal on the resume page
    pub reveal_interval_ms: u32,
}

impl Default for TypingConfig {
    fn default() -> Self {
        TypingConfig {
            trigger: String::from("Full Stack Developer"),
            phrases: [
                "Full Stack Developer",
                "Frontend Specialist",
                "Backend Engineer",
                "UI/UX Designer",
                "Problem Solver",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            type_ms: 100,
            delete_ms: 50,
            hold_ms: 2000,
            next_phrase_ms: 500,
            reveal_interval_ms: 50,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FormConfig {
    pub banner_ms: u32,
    pub banner_text: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        FormConfig {
            banner_ms: 5000,
            banner_text: String::from("Thank you! Your message has been sent successfully."),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct NavConfig {
    // added to the scroll position before matching it against section spans
    pub section_offset: f64,
    pub scrolled_threshold: f64,
    pub mobile_breakpoint: f64,
    pub scroll_throttle_ms: u32,
    pub resize_debounce_ms: u32,
    pub parallax_rate: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        NavConfig {
            section_offset: 100.0,
            scrolled_threshold: 50.0,
            mobile_breakpoint: 768.0,
            scroll_throttle_ms: 16,
            resize_debounce_ms: 250,
            parallax_rate: -0.5,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PrintConfig {
    // selectors hidden while printing
    pub hidden_controls: Vec<String>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            hidden_controls: ["#print-btn", "#theme-toggle", ".footer-actions"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

// in order to keep room for non-folio tables in the same document, the settings live in
// a [config] subtable of the root node
#[derive(Debug, Deserialize, Serialize)]
struct TomlConfigFile {
    #[serde(default)]
    config: SiteConfig,
}

#[instrument(level=Level::DEBUG, skip(doc))]
pub fn read_config(doc: &str) -> Result<SiteConfig> {
    debug!("parsing site config");

    let data: TomlConfigFile = toml::from_str(doc)?;

    debug!("successfully parsed site config");
    Ok(data.config)
}
