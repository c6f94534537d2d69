use crate::{
    entities::MapPoint,
    gateways::{
        geocode::GeoCodingGateway,
        notify::{UserNotification, UserNotificationGateway},
    },
    map::{MapInitError, MapLevel, StaticMapSurface},
};

/// Renders the location of a single class on a static map.
///
/// Returns `Ok(None)` if the address could not be resolved.
pub async fn show_class_location<G, S, N>(
    geocoder: &G,
    surface: &mut S,
    notifier: &N,
    address: &str,
) -> Result<Option<MapPoint>, MapInitError>
where
    G: GeoCodingGateway,
    S: StaticMapSurface,
    N: UserNotificationGateway,
{
    let pos = match geocoder.resolve_address(address).await {
        Ok(pos) => pos,
        Err(err) => {
            log::warn!("Failed to resolve class location '{address}': {err}");
            notifier.notify(UserNotification::AddressNotResolved {
                address: address.to_owned(),
            });
            return Ok(None);
        }
    };
    surface.render_static_map(pos, MapLevel::DEFAULT, pos)?;
    Ok(Some(pos))
}
