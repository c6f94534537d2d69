use crate::{
    config::Config,
    gateways,
    headless::HeadlessMap,
    session::{self, Script, Session},
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use classmap_boundary as json;
use classmap_core::{
    entities::{BoundingBox, ClassId, MapBbox, MapPoint},
    gateways::{
        classes::{ClassSummaryGateway, NearbyClassesGateway},
        geocode::GeoCodingGateway,
    },
    map::MapLevel,
    usecases::{self, MapSettings},
};
use classmap_gateways::notify::LogNotifier;
use std::{io, path::PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Configuration file (defaults to ./classmap.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve an address into a coordinate
    Geocode { address: String },
    /// Show the location of a class on a static map
    Location { address: String },
    /// Fetch the summary of a class
    Summary { class_id: ClassId },
    /// List the classes within a bounding box
    Nearby {
        /// sw_lat,sw_lng,ne_lat,ne_lng
        #[arg(allow_hyphen_values = true)]
        bbox: MapBbox,
    },
    /// Run a scripted session on a headless map
    Map(MapArgs),
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Reference address to center the map on
    #[arg(long, default_value = "")]
    pub address: String,

    /// JSON file with a list of `{class_id, location}`
    #[arg(long, value_name = "FILE")]
    pub classes: Option<PathBuf>,

    /// Click on the marker of a class
    #[arg(long = "click", value_name = "CLASS_ID")]
    pub clicks: Vec<ClassId>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    pub zoom: Option<MapLevel>,

    /// Drag the map to a new center (lat,lng)
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub drag: Option<MapPoint>,

    /// Close all open overlays after clicking
    #[arg(long)]
    pub close: bool,

    /// Recenter the map on another address
    #[arg(long, value_name = "ADDRESS")]
    pub recenter: Option<String>,

    /// Query the nearby classes for every reported bounding box
    #[arg(long)]
    pub nearby: bool,
}

fn parse_level(s: &str) -> Result<MapLevel, String> {
    let level: u8 = s.parse().map_err(|err| format!("{err}"))?;
    MapLevel::try_new(level)
        .ok_or_else(|| format!("expected a level in {}..={}", MapLevel::MIN, MapLevel::MAX))
}

pub async fn run(cfg: Config, command: Command) -> Result<()> {
    match command {
        Command::Geocode { address } => {
            let geocoder = gateways::geocoding_gateway(&cfg.geocoding)?;
            let pos = geocoder.resolve_address(&address).await?;
            print_json(&json::Coordinate::from(pos))
        }
        Command::Location { address } => {
            let geocoder = gateways::geocoding_gateway(&cfg.geocoding)?;
            let mut map = HeadlessMap::new(
                cfg.map.container,
                cfg.map.viewport_width,
                cfg.map.viewport_height,
            );
            usecases::show_class_location(&geocoder, &mut map, &LogNotifier, &address).await?;
            if let Some(view) = map.static_view() {
                print_json(&serde_json::json!({
                    "center": json::Coordinate::from(view.center),
                    "level": view.level.to_u8(),
                    "marker": json::Coordinate::from(view.marker),
                }))?;
            }
            Ok(())
        }
        Command::Summary { class_id } => {
            let api = gateways::class_api(&cfg.api)?;
            let summary = api.class_summary(class_id).await?;
            print_json(&json::ClassAdditionalData::from(summary))
        }
        Command::Nearby { bbox } => {
            let api = gateways::class_api(&cfg.api)?;
            let classes = api.nearby_classes(&BoundingBox::from(bbox)).await?;
            for class in classes {
                print_json(&json::NearbyClass::from(class))?;
            }
            Ok(())
        }
        Command::Map(args) => {
            let MapArgs {
                address,
                classes,
                clicks,
                close,
                zoom,
                drag,
                recenter,
                nearby,
            } = args;
            let entries = match classes {
                Some(path) => session::read_class_locations(&path)?,
                None => vec![],
            };
            let geocoder = gateways::geocoding_gateway(&cfg.geocoding)?;
            let api = gateways::class_api(&cfg.api)?;
            let map = HeadlessMap::new(
                cfg.map.container,
                cfg.map.viewport_width,
                cfg.map.viewport_height,
            );
            let settings = MapSettings {
                fallback_center: cfg.map.fallback_center,
                level: cfg.map.level,
            };
            let mut session = Session::new(geocoder, api, map, LogNotifier, settings, io::stdout());
            let script = Script {
                reference_address: address,
                entries,
                recenter,
                zoom,
                drag,
                clicks,
                close_overlays: close,
                query_nearby: nearby,
            };
            session.run(script).await
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
