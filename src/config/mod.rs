use anyhow::{anyhow, Result};
use classmap_core::{entities::MapPoint, map::MapLevel};
use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "classmap.toml";

const ENV_NAME_API_URL: &str = "CLASSMAP_API_URL";
const ENV_NAME_KAKAO_API_KEY: &str = "KAKAO_REST_API_KEY";
const ENV_NAME_OPENCAGE_API_KEY: &str = "OPENCAGE_API_KEY";

pub struct Config {
    pub map: Map,
    pub api: Api,
    pub geocoding: Geocoding,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let mut raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::debug!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    Ok(raw::Config::default())
                }
                _ => Err(err),
            }?,
        };
        override_from_env(&mut raw_config);
        Self::try_from(raw_config)
    }
}

fn override_from_env(cfg: &mut raw::Config) {
    if let Ok(url) = env::var(ENV_NAME_API_URL) {
        cfg.api.get_or_insert_with(Default::default).url = url;
    }
    let kakao_api_key = env::var(ENV_NAME_KAKAO_API_KEY).ok();
    let opencage_api_key = env::var(ENV_NAME_OPENCAGE_API_KEY).ok();
    if kakao_api_key.is_none() && opencage_api_key.is_none() {
        return;
    }
    let gateway = cfg.gateway.get_or_insert_with(Default::default);
    if let Some(api_key) = kakao_api_key {
        gateway.kakao.get_or_insert_with(Default::default).api_key = Some(api_key);
    }
    if let Some(api_key) = opencage_api_key {
        gateway.opencage.get_or_insert_with(Default::default).api_key = Some(api_key);
    }
}

pub struct Map {
    /// Name of the element the interactive map is rendered into.
    pub container: String,
    pub fallback_center: MapPoint,
    pub level: MapLevel,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

pub struct Api {
    /// Base URL of the class API without a trailing slash.
    pub url: String,
    pub timeout: Option<Duration>,
}

pub struct Geocoding {
    pub gateway: Option<GeocodingGateway>,
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub enum GeocodingGateway {
    Kakao {
        api_url: Option<String>,
        api_key: String,
    },
    OpenCage {
        api_key: String,
    },
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            map,
            api,
            geocoding,
            gateway,
        } = from;

        let raw::Map {
            container,
            fallback_center,
            level,
            viewport_width,
            viewport_height,
        } = map.unwrap_or_default();

        if container.trim().is_empty() {
            return Err(anyhow!("No map container defined"));
        }
        let fallback_center: MapPoint = fallback_center
            .parse()
            .map_err(|err| anyhow!("Invalid fallback center '{fallback_center}': {err}"))?;
        let level = MapLevel::try_new(level).ok_or_else(|| {
            anyhow!(
                "Map level {level} is out of range ({}..={})",
                MapLevel::MIN,
                MapLevel::MAX
            )
        })?;
        if viewport_width == 0 || viewport_height == 0 {
            return Err(anyhow!("The map viewport must not be empty"));
        }
        let map = Map {
            container,
            fallback_center,
            level,
            viewport_width,
            viewport_height,
        };

        let raw::Api { url, timeout } = api.unwrap_or_default();
        let url = url.trim_end_matches('/').to_owned();
        if url.is_empty() {
            return Err(anyhow!("No API URL defined"));
        }
        let api = Api { url, timeout };

        let (gateway_name, timeout) = geocoding
            .map(|g| (g.gateway, g.timeout))
            .unwrap_or_default();
        let geo_gateway = match gateway_name {
            Some(gw_name) => {
                let gateway = gateway.unwrap_or_default();
                match gw_name {
                    raw::GeocodingGateway::Kakao => {
                        let raw::Kakao { api_url, api_key } = gateway.kakao.unwrap_or_default();
                        if api_key.is_none() {
                            log::warn!("No Kakao REST API key found");
                        }
                        api_key.map(|api_key| GeocodingGateway::Kakao { api_url, api_key })
                    }
                    raw::GeocodingGateway::Opencage => {
                        let raw::OpenCage { api_key } = gateway
                            .opencage
                            .ok_or_else(|| anyhow!("Missing 'opencage' gateway configuration"))?;
                        if api_key.is_none() {
                            log::warn!("No OpenCage API key found");
                        }
                        api_key.map(|api_key| GeocodingGateway::OpenCage { api_key })
                    }
                }
            }
            None => None,
        };
        let geocoding = Geocoding {
            gateway: geo_gateway,
            timeout,
        };

        Ok(Self {
            map,
            api,
            geocoding,
        })
    }
}
