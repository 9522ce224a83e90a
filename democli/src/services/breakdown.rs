//! Breakdown element search and aggregated property retrieval.

use crate::config::{SearchSettings, SensorSettings};
use crate::models::{ContainerReference, SensorSamplePage};
use chrono::{NaiveDateTime, TimeZone};
use plm_core::plm::{AggregatedPropertyQuery, NodeSearch, PlmBackend, SessionToken};
use plm_core::PlmError;
use tracing::instrument;

pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Find the breakdown element holding the sensor data.
///
/// Exactly one match is expected; the first one is taken and an empty
/// result set is an error.
#[instrument(skip(backend, token, search))]
pub async fn search_for_sensor_data_container<B: PlmBackend + ?Sized>(
    backend: &B,
    token: &SessionToken,
    project_id: &str,
    repo_name: &str,
    user_type: &str,
    search: &SearchSettings,
) -> Result<ContainerReference, PlmError> {
    let query = NodeSearch {
        repository: repo_name.to_string(),
        model: project_id.to_string(),
        user_type: user_type.to_string(),
        pattern: search.pattern.clone(),
        description: search.description.clone(),
        limit: search.limit,
        prop_names: vec![search.property_name.clone()],
        prop_values: vec![search.property_value.clone()],
    };

    let res = backend.search_nodes(token, &query).await?;
    if res.len() > 1 {
        tracing::warn!(matches = res.len(), "Search matched several elements; using the first");
    }

    let element = res.into_iter().next().ok_or_else(|| {
        PlmError::empty(format!(
            "no breakdown element with {} = {}",
            search.property_name, search.property_value
        ))
    })?;

    Ok(ContainerReference {
        instance_id: element.bkdn_elem_info.instance_id,
        name: element.bkdn_elem_info.name,
    })
}

/// Fetch one page of the configured aggregated property of `element_id`.
///
/// The window starts at `sensor.from` and is left open at the top.
#[instrument(skip(backend, token, sensor))]
pub async fn retrieve_sensor_data<B: PlmBackend + ?Sized>(
    backend: &B,
    token: &SessionToken,
    repo_name: &str,
    project_id: &str,
    element_id: &str,
    sensor: &SensorSettings,
) -> Result<SensorSamplePage, PlmError> {
    let dt_from = epoch_seconds(&sensor.from, &chrono::Local)?;

    let query = AggregatedPropertyQuery {
        repository: repo_name.to_string(),
        model: project_id.to_string(),
        node: element_id.to_string(),
        property_uri: sensor.property_uri.clone(),
        from: Some(dt_from.to_string()),
        to: None,
        page: sensor.page,
        page_size: sensor.page_size,
    };

    let aggr_prop = backend.get_aggregated_property(token, &query).await?;
    tracing::info!(values = aggr_prop.values.len(), "Retrieved sensor data");

    Ok(SensorSamplePage {
        property_uri: query.property_uri,
        page: query.page,
        page_size: query.page_size,
        values: aggr_prop.values,
    })
}

/// Whole-second Unix timestamp of a `%Y/%m/%d %H:%M:%S` time in `tz`.
///
/// For a local time that occurs twice (DST fall-back) the earlier instant
/// is used; a time skipped by DST is rejected.
pub fn epoch_seconds<Tz: TimeZone>(human: &str, tz: &Tz) -> Result<i64, PlmError> {
    let naive = NaiveDateTime::parse_from_str(human.trim(), TIMESTAMP_FORMAT)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(|| PlmError::config(format!("'{}' does not exist in the local time zone", human)))
}
