use super::error::GeocodeError;
use super::response::{GeocodeFeature, GeocodeRecord, GeocodeResponse};
use super::PlaceCandidate;
use crate::geo::Coordinate;

pub(super) fn parse_body(body: &str) -> Result<GeocodeResponse, GeocodeError> {
    Ok(serde_json::from_str(body)?)
}

fn records(resp: GeocodeResponse) -> Vec<(GeocodeRecord, Option<Coordinate>)> {
    match resp {
        GeocodeResponse::Results { results } | GeocodeResponse::Bare(results) => results
            .into_iter()
            .map(|record| {
                let coordinate = record_coordinate(&record);
                (record, coordinate)
            })
            .collect(),
        GeocodeResponse::Features { features } => {
            features.into_iter().map(feature_record).collect()
        }
    }
}

fn feature_record(feature: GeocodeFeature) -> (GeocodeRecord, Option<Coordinate>) {
    let from_geometry = feature
        .geometry
        .as_ref()
        .and_then(|geometry| match geometry.coordinates.as_slice() {
            [lng, lat, ..] => Some(Coordinate::new(*lat, *lng)),
            _ => None,
        });
    let coordinate = from_geometry.or_else(|| record_coordinate(&feature.properties));
    (feature.properties, coordinate)
}

fn record_coordinate(record: &GeocodeRecord) -> Option<Coordinate> {
    let (lat, lng) = match (record.lat, record.lon) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => (record.latitude?, record.longitude?),
    };
    Some(Coordinate::new(lat, lng)).filter(Coordinate::is_valid)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// "street city region", trimmed; falls back to the formatted address.
pub(super) fn format_address(record: &GeocodeRecord) -> Option<String> {
    let parts: Vec<&str> = [&record.street, &record.city, &record.state]
        .into_iter()
        .filter_map(|part| non_blank(part.as_deref()))
        .collect();
    if !parts.is_empty() {
        return Some(parts.join(" "));
    }
    non_blank(record.formatted.as_deref()).map(str::to_string)
}

/// Address of the first usable record, if any.
pub(super) fn parse_reverse_response(resp: GeocodeResponse) -> Option<String> {
    records(resp)
        .iter()
        .find_map(|(record, _)| format_address(record))
}

/// Every record with a valid coordinate, in response order.
pub(super) fn parse_search_response(resp: GeocodeResponse) -> Vec<PlaceCandidate> {
    records(resp)
        .into_iter()
        .filter_map(|(record, coordinate)| {
            let coordinate = coordinate?;
            let address = format_address(&record);
            let name = non_blank(record.name.as_deref())
                .map(str::to_string)
                .or_else(|| non_blank(record.formatted.as_deref()).map(str::to_string))
                .or_else(|| address.clone())?;
            Some(PlaceCandidate {
                name,
                address,
                coordinate,
            })
        })
        .collect()
}
