use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const VOC_VAL_URL: &str =
    "http://pascallin.ecs.soton.ac.uk/challenges/VOC/voc2007/VOCtrainval_06-Nov-2007.tar";
const VOC_TEST_URL: &str =
    "http://pascallin.ecs.soton.ac.uk/challenges/VOC/voc2007/VOCtest_06-Nov-2007.tar";
const CNN_MEAN_URL: &str =
    "http://www.robots.ox.ac.uk/~vgg/software/deep_eval/releases/bvlc/VGG_mean.binaryproto";
const CNN_PROTO_URL: &str =
    "http://www.robots.ox.ac.uk/~vgg/software/deep_eval/releases/bvlc/VGG_CNN_M_128_deploy.prototxt";
const CNN_MODEL_URL: &str =
    "http://www.robots.ox.ac.uk/~vgg/software/deep_eval/releases/bvlc/VGG_CNN_M_128.caffemodel";
const NEG_IMAGES_URL: &str =
    "http://www.robots.ox.ac.uk/~vgg/software/deep_eval/releases/neg_images.tar";

/// HTTP transfer parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Abort a transfer slower than this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Optional `User-Agent` header; libcurl sends none when unset.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            user_agent: None,
        }
    }
}

/// How downloaded artifacts of a source set end up in the target directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterializeMode {
    /// Unpack as a tar archive (plain or gzip-compressed).
    Extract,
    /// Copy the file verbatim.
    Copy,
    /// Sniff the downloaded bytes: extract archives, copy everything else.
    #[default]
    Auto,
}

/// One URL to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Logical name, used in progress output and as a filename fallback.
    pub name: String,
    pub url: String,
    /// Filename to stage (and copy) the download under. Derived from the URL when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl UrlEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A named batch of URLs materialized into one target directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub name: String,
    /// Target directory, relative to the install directory (absolute paths are used as-is).
    pub target: PathBuf,
    #[serde(default)]
    pub mode: MaterializeMode,
    pub urls: Vec<UrlEntry>,
}

/// Global configuration loaded from `~/.config/provision/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Server config file to patch, relative to the install directory.
    pub config_file: PathBuf,
    /// Dataset directory substituted for `<DSET_DIR>`. Relative paths resolve against the install directory.
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: Option<PathBuf>,
    #[serde(default)]
    pub http: HttpConfig,
    /// Source sets, fetched in order.
    pub sources: Vec<SourceSet>,
}

/// Where the VOC archives of the `dset_images` set unpack.
fn default_dataset_dir() -> Option<PathBuf> {
    Some(PathBuf::from("server_data/dset_images/VOCdevkit/VOC2007"))
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("config.prototxt"),
            dataset_dir: default_dataset_dir(),
            http: HttpConfig::default(),
            sources: vec![
                SourceSet {
                    name: "dset_images".to_string(),
                    target: PathBuf::from("server_data/dset_images"),
                    mode: MaterializeMode::Extract,
                    urls: vec![
                        UrlEntry::new("val", VOC_VAL_URL).with_file_name("val.tar"),
                        UrlEntry::new("test", VOC_TEST_URL).with_file_name("test.tar"),
                    ],
                },
                SourceSet {
                    name: "neg_images".to_string(),
                    target: PathBuf::from("server_data/neg_images"),
                    mode: MaterializeMode::Extract,
                    urls: vec![UrlEntry::new("neg_images", NEG_IMAGES_URL)],
                },
                SourceSet {
                    name: "models".to_string(),
                    target: PathBuf::from("model_data"),
                    mode: MaterializeMode::Copy,
                    urls: vec![
                        UrlEntry::new("mean", CNN_MEAN_URL),
                        UrlEntry::new("proto", CNN_PROTO_URL),
                        UrlEntry::new("model", CNN_MODEL_URL),
                    ],
                },
            ],
        }
    }
}

impl ProvisionConfig {
    /// Looks up a source set by name.
    pub fn source(&self, name: &str) -> Option<&SourceSet> {
        self.sources.iter().find(|s| s.name == name)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("provision")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProvisionConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProvisionConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file. Never creates it.
pub fn load_from_path(path: &Path) -> Result<ProvisionConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: ProvisionConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
