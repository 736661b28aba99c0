use ahash::HashMap;
use itertools::Itertools;

use crate::model::Record;

/// Blocking key of a record: trimmed, lowercased values of the blocking fields, joined by pipes.
pub(crate) fn blocking_key(record: &Record, fields: &[String]) -> String {
  fields.iter().map(|field| record.text(field).unwrap_or_default().trim().to_lowercase()).join("|")
}

/// Partition record indices into comparison blocks.
///
/// Without blocking fields, all records form a single block. Otherwise records
/// are grouped by blocking key and groups holding a single record are dropped.
/// Blocks are ordered by their first index, and indices are ascending within
/// each block.
pub(crate) fn blocks(records: &[Record], fields: &[String]) -> Vec<Vec<usize>> {
  if records.len() < 2 {
    return Vec::new();
  }

  if fields.is_empty() {
    return vec![(0..records.len()).collect()];
  }

  let mut groups: HashMap<String, Vec<usize>> = HashMap::default();

  for (index, record) in records.iter().enumerate() {
    groups.entry(blocking_key(record, fields)).or_default().push(index);
  }

  let mut blocks = groups.into_values().filter(|block| block.len() >= 2).collect::<Vec<_>>();

  blocks.sort_unstable_by_key(|block| block[0]);

  tracing::debug!(blocks = blocks.len(), fields = ?fields, "built comparison blocks");

  blocks
}

/// Every unordered pair of indices within a block, each exactly once.
pub(crate) fn candidate_pairs(block: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
  block.iter().copied().tuple_combinations()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use crate::model::Record;

  fn records() -> Vec<Record> {
    vec![
      Record::builder().fields(&[("name", json!("Alice")), ("city", json!("Paris"))]).build(),
      Record::builder().fields(&[("name", json!("Alice")), ("city", json!("London"))]).build(),
      Record::builder().fields(&[("name", json!("Bob")), ("city", json!(" paris "))]).build(),
      Record::builder().fields(&[("name", json!("Carol")), ("city", json!("Berlin"))]).build(),
      Record::builder().fields(&[("name", json!("Dave")), ("city", json!("LONDON"))]).build(),
    ]
  }

  #[test]
  fn blocking_key() {
    let record = Record::builder().fields(&[("city", json!(" Paris ")), ("zip", json!(75001))]).build();

    assert_eq!(super::blocking_key(&record, &["city".to_string(), "zip".to_string()]), "paris|75001");
    assert_eq!(super::blocking_key(&record, &["city".to_string(), "country".to_string()]), "paris|");
  }

  #[test]
  fn without_blocking_fields() {
    assert_eq!(super::blocks(&records(), &[]), vec![vec![0, 1, 2, 3, 4]]);
    assert!(super::blocks(&records()[..1], &[]).is_empty());
  }

  #[test]
  fn grouped_by_key() {
    let blocks = super::blocks(&records(), &["city".to_string()]);

    assert_eq!(blocks, vec![vec![0, 2], vec![1, 4]]);
  }

  #[test]
  fn records_with_different_keys_are_never_paired() {
    let records = vec![
      Record::builder().fields(&[("name", json!("Alice")), ("city", json!("Paris"))]).build(),
      Record::builder().fields(&[("name", json!("Alice")), ("city", json!("Rome"))]).build(),
    ];

    assert!(super::blocks(&records, &["city".to_string()]).is_empty());
  }

  #[test]
  fn candidate_pairs() {
    assert_eq!(super::candidate_pairs(&[1, 4, 6]).collect::<Vec<_>>(), [(1, 4), (1, 6), (4, 6)]);
    assert_eq!(super::candidate_pairs(&[2]).count(), 0);
  }
}
