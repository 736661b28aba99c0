use jiff::{Timestamp, civil, tz::TimeZone};
use serde_json::Value;

use crate::model::{MatchCluster, MergeStrategy, Record, is_filled};

/// Fields looked up, in order, to find the most recent record of a cluster.
const TIMESTAMP_FIELDS: [&str; 8] = ["updatedAt", "updated_at", "modifiedAt", "modified_at", "createdAt", "created_at", "date", "timestamp"];

/// Pick the master record of a cluster from its sorted members.
pub(crate) fn select_master(records: &[Record], members: &[usize], strategy: MergeStrategy) -> usize {
  let Some(&first) = members.first() else {
    return 0;
  };

  match strategy {
    MergeStrategy::KeepFirst | MergeStrategy::Manual | MergeStrategy::Custom => first,
    MergeStrategy::KeepLast => members.last().copied().unwrap_or(first),
    MergeStrategy::KeepMostComplete => most_complete(records, members).unwrap_or(first),
    MergeStrategy::KeepMostRecent => most_recent(records, members).unwrap_or(first),
  }
}

fn most_complete(records: &[Record], members: &[usize]) -> Option<usize> {
  let mut best: Option<(usize, usize)> = None;

  for &index in members {
    let Some(record) = records.get(index) else {
      continue;
    };

    let filled = record.filled_fields();

    if best.is_none_or(|(_, most)| filled > most) {
      best = Some((index, filled));
    }
  }

  best.map(|(index, _)| index)
}

fn most_recent(records: &[Record], members: &[usize]) -> Option<usize> {
  let mut best: Option<(usize, Timestamp)> = None;

  for &index in members {
    let Some(record) = records.get(index) else {
      continue;
    };

    for field in TIMESTAMP_FIELDS {
      let Some(timestamp) = parse_timestamp(record.value(field)) else {
        continue;
      };

      if best.is_none_or(|(_, latest)| timestamp > latest) {
        best = Some((index, timestamp));
      }
    }
  }

  best.map(|(index, _)| index)
}

/// Read a value as an instant.
///
/// Text may be an RFC 3339 timestamp, or a civil date-time or date read as
/// UTC. Numbers are milliseconds since the Unix epoch.
pub(crate) fn parse_timestamp(value: &Value) -> Option<Timestamp> {
  match value {
    Value::String(text) => {
      let text = text.trim();

      if let Ok(timestamp) = text.parse::<Timestamp>() {
        return Some(timestamp);
      }
      if let Ok(datetime) = text.parse::<civil::DateTime>() {
        return datetime.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp());
      }

      text.parse::<civil::Date>().ok()?.to_zoned(TimeZone::UTC).ok().map(|zoned| zoned.timestamp())
    }

    Value::Number(number) => {
      let millis = number.as_i64().or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n as i64))?;

      Timestamp::from_millisecond(millis).ok()
    }

    _ => None,
  }
}

/// Build the survivor record of a cluster.
///
/// With `keep-most-complete`, fields that are blank on the master are filled
/// from the first member, in member order, holding a value for them. Every
/// other strategy returns the master as is.
pub(crate) fn merge(records: &[Record], cluster: &MatchCluster, strategy: MergeStrategy) -> Record {
  let mut survivor = records.get(cluster.master).cloned().unwrap_or_default();

  if strategy != MergeStrategy::KeepMostComplete {
    return survivor;
  }

  for record in cluster.members.iter().filter(|&&index| index != cluster.master).filter_map(|&index| records.get(index)) {
    for (field, value) in record.fields() {
      if is_filled(value) && !survivor.is_filled(field) {
        survivor.insert(field.clone(), value.clone());
      }
    }
  }

  survivor
}

/// Survivor records: one merged record per cluster, in cluster order, then
/// every record outside of any cluster, in input order.
pub(crate) fn survivors(records: &[Record], clusters: &[MatchCluster], strategy: MergeStrategy) -> Vec<Record> {
  let mut clustered = vec![false; records.len()];

  for index in clusters.iter().flat_map(|cluster| cluster.members.iter()) {
    if let Some(flag) = clustered.get_mut(*index) {
      *flag = true;
    }
  }

  clusters
    .iter()
    .map(|cluster| merge(records, cluster, strategy))
    .chain(records.iter().zip(clustered).filter(|(_, clustered)| !clustered).map(|(record, _)| record.clone()))
    .collect()
}
