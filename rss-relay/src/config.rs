use crate::relevance::{CriteriaPreset, RelevanceCriteria};
use crate::rss_utils::url::is_valid_rss_url;
use crate::types::{FetchConfig, Ingester, LiveSourceSpec, RelayError, Result, WatchRest};
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHANNEL_ID: &str = "@my_ai_channel";
pub const DEFAULT_SEEN_FILE: &str = "published_links.txt";

pub const DEFAULT_FEEDS: &[&str] = &[
    "https://hnrss.org/newest",
    "https://www.indiehackers.com/feed.xml",
    "https://bootstrappers.io/feed",
    "https://bensbites.substack.com/feed",
];

/// Value of `--target-language` that switches translation off.
const TRANSLATION_OFF: &str = "off";

#[derive(Debug, Parser)]
#[command(name = "rss-relay", version, about = "Relays relevant RSS entries to a Telegram channel")]
pub struct Cli {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Destination chat id or @channel handle
    #[arg(long, env = "CHANNEL_ID", default_value = DEFAULT_CHANNEL_ID)]
    pub channel_id: String,

    /// Feed URL to poll; repeat the flag or comma-separate to give several
    #[arg(long = "feed", env = "RELAY_FEEDS", value_delimiter = ',')]
    pub feeds: Vec<String>,

    /// Append-only file of already published links
    #[arg(long, env = "RELAY_SEEN_FILE", default_value = DEFAULT_SEEN_FILE)]
    pub seen_file: PathBuf,

    /// Seconds between two cycles
    #[arg(long, env = "RELAY_INTERVAL_SECS", default_value_t = 900)]
    pub interval_secs: u64,

    /// Seconds to wait before the first cycle
    #[arg(long, env = "RELAY_FIRST_DELAY_SECS", default_value_t = 10)]
    pub first_delay_secs: u64,

    /// Keyword rule deciding which entries are published
    #[arg(long, env = "RELAY_CRITERIA", value_enum, default_value_t = CriteriaPreset::Ai)]
    pub criteria: CriteriaPreset,

    /// Match on title and summary, and post the summary as message body
    #[arg(long, env = "RELAY_INCLUDE_SUMMARY")]
    pub include_summary: bool,

    /// Language code to translate into, or "off"
    #[arg(long, env = "RELAY_TARGET_LANGUAGE", default_value = "ru")]
    pub target_language: String,

    /// Summary length bound in characters, before the ellipsis
    #[arg(long, env = "RELAY_SUMMARY_MAX_LEN", default_value_t = 300)]
    pub summary_max_len: usize,

    /// Run a single cycle and exit
    #[arg(long, env = "RELAY_ONCE")]
    pub once: bool,

    /// Do not answer bot commands
    #[arg(long, env = "RELAY_NO_COMMANDS")]
    pub no_commands: bool,
}

/// Everything the relay needs, validated once at startup.
#[derive(Clone)]
pub struct RelayConfig {
    pub bot_token: String,
    pub channel_id: String,
    pub feeds: Vec<LiveSourceSpec>,
    pub seen_file: PathBuf,
    pub interval: Duration,
    pub first_delay: Duration,
    pub criteria: RelevanceCriteria,
    pub include_summary: bool,
    /// `None` disables translation.
    pub target_language: Option<String>,
    pub summary_max_len: usize,
    pub fetch: FetchConfig,
}

impl RelayConfig {
    /// Defaults for every setting except the credentials.
    pub fn new(bot_token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            channel_id: channel_id.into(),
            feeds: DEFAULT_FEEDS.iter().map(|uri| LiveSourceSpec::new(*uri)).collect(),
            seen_file: PathBuf::from(DEFAULT_SEEN_FILE),
            interval: Duration::from_secs(900),
            first_delay: Duration::from_secs(10),
            criteria: RelevanceCriteria::ai(),
            include_summary: false,
            target_language: Some("ru".to_string()),
            summary_max_len: 300,
            fetch: FetchConfig::default(),
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let bot_token = cli
            .bot_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RelayError::Config("BOT_TOKEN is not set".to_string()))?;

        let channel_id = cli.channel_id.trim();
        if channel_id.is_empty() {
            return Err(RelayError::Config("CHANNEL_ID is empty".to_string()));
        }

        if cli.interval_secs == 0 {
            return Err(RelayError::Config("interval must be at least one second".to_string()));
        }

        let mut config = Self::new(bot_token, channel_id);

        let feeds: Vec<&str> = cli
            .feeds
            .iter()
            .map(|feed| feed.trim())
            .filter(|feed| !feed.is_empty())
            .collect();
        if !feeds.is_empty() {
            if let Some(bad) = feeds.iter().find(|feed| !is_valid_rss_url(feed)) {
                return Err(RelayError::Config(format!("invalid feed URL: {}", bad)));
            }
            config.feeds = feeds.into_iter().map(LiveSourceSpec::new).collect();
        }

        let target_language = cli.target_language.trim();
        config.target_language = if target_language.is_empty() || target_language.eq_ignore_ascii_case(TRANSLATION_OFF) {
            None
        } else {
            Some(target_language.to_string())
        };

        config.seen_file = cli.seen_file.clone();
        config.interval = Duration::from_secs(cli.interval_secs);
        config.first_delay = Duration::from_secs(cli.first_delay_secs);
        config.criteria = RelevanceCriteria::from_preset(cli.criteria);
        config.include_summary = cli.include_summary;
        config.summary_max_len = cli.summary_max_len;

        Ok(config)
    }
}

impl RelayConfig {
    /// Period of the cycle timer: the shortest rest any configured source asks for.
    pub fn cycle_rest(&self) -> Duration {
        self.feeds
            .iter()
            .map(|source| self.watch(source))
            .min()
            .unwrap_or_else(|| WatchRest::from(self.interval))
            .as_duration()
    }
}

/// Every source is polled once per cycle, at the configured interval.
impl Ingester for RelayConfig {
    fn watch(&self, _source: &LiveSourceSpec) -> WatchRest {
        WatchRest::from(self.interval)
    }
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("bot_token", &"***")
            .field("channel_id", &self.channel_id)
            .field("feeds", &self.feeds.iter().map(|f| f.uri.as_str()).collect::<Vec<_>>())
            .field("seen_file", &self.seen_file)
            .field("interval", &self.interval)
            .field("first_delay", &self.first_delay)
            .field("criteria", &self.criteria)
            .field("include_summary", &self.include_summary)
            .field("target_language", &self.target_language)
            .field("summary_max_len", &self.summary_max_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["rss-relay"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let mut parsed = cli(&[]);
        parsed.bot_token = None;
        assert!(matches!(RelayConfig::from_cli(&parsed), Err(RelayError::Config(_))));

        parsed.bot_token = Some("   ".to_string());
        assert!(matches!(RelayConfig::from_cli(&parsed), Err(RelayError::Config(_))));
    }

    #[test]
    fn defaults_apply_when_only_token_given() {
        let mut parsed = cli(&["--bot-token", "123:abc"]);
        parsed.channel_id = DEFAULT_CHANNEL_ID.to_string();
        parsed.feeds.clear();
        let config = RelayConfig::from_cli(&parsed).unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(config.feeds.len(), DEFAULT_FEEDS.len());
        assert_eq!(config.criteria, RelevanceCriteria::ai());
        assert_eq!(config.target_language.as_deref(), Some("ru"));
        assert!(!config.include_summary);
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = cli(&[
            "--bot-token",
            "123:abc",
            "--channel-id=-100200300",
            "--feed",
            "https://hnrss.org/newest,https://bootstrappers.io/feed",
            "--criteria",
            "solo-founder",
            "--include-summary",
            "--target-language",
            "off",
            "--interval-secs",
            "30",
        ]);
        let config = RelayConfig::from_cli(&parsed).unwrap();

        assert_eq!(config.channel_id, "-100200300");
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.criteria, RelevanceCriteria::solo_founder());
        assert!(config.include_summary);
        assert_eq!(config.target_language, None);
        assert_eq!(config.interval, Duration::from_secs(30));
    }

    #[test]
    fn rejects_bad_feed_urls_and_zero_interval() {
        let parsed = cli(&["--bot-token", "t", "--feed", "hnrss.org/newest"]);
        assert!(matches!(RelayConfig::from_cli(&parsed), Err(RelayError::Config(_))));

        let parsed = cli(&["--bot-token", "t", "--interval-secs", "0"]);
        assert!(matches!(RelayConfig::from_cli(&parsed), Err(RelayError::Config(_))));
    }

    #[test]
    fn sources_rest_for_the_configured_interval() {
        let parsed = cli(&["--bot-token", "t", "--interval-secs", "30"]);
        let config = RelayConfig::from_cli(&parsed).unwrap();

        let rest = config.watch(&LiveSourceSpec::new("https://hnrss.org/newest"));
        assert_eq!(rest, WatchRest { wait_at_least_ms: 30_000 });
        assert_eq!(rest.as_duration(), Duration::from_secs(30));
        assert_eq!(config.cycle_rest(), Duration::from_secs(30));

        let mut without_feeds = config.clone();
        without_feeds.feeds.clear();
        assert_eq!(without_feeds.cycle_rest(), Duration::from_secs(30));
    }

    #[test]
    fn run_mode_flags_read_the_environment_names() {
        let parsed = cli(&["--bot-token", "t", "--once", "--no-commands"]);
        assert!(parsed.once);
        assert!(parsed.no_commands);

        let command = <Cli as clap::CommandFactory>::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };
        assert_eq!(env_of("once").as_deref(), Some("RELAY_ONCE"));
        assert_eq!(env_of("no_commands").as_deref(), Some("RELAY_NO_COMMANDS"));
    }

    #[test]
    fn debug_output_hides_token() {
        let config = RelayConfig::new("123:secret", DEFAULT_CHANNEL_ID);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("123:secret"));
    }
}
