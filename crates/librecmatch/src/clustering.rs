use std::cmp::Ordering;

use ahash::HashMap;
use uuid::Uuid;

use crate::model::{MatchCluster, MatchPair};

/// Disjoint-set forest with path compression and union by rank.
struct UnionFind {
  parent: Vec<usize>,
  rank: Vec<usize>,
}

impl UnionFind {
  fn new(size: usize) -> Self {
    Self {
      parent: (0..size).collect(),
      rank: vec![0; size],
    }
  }

  fn find(&mut self, x: usize) -> usize {
    let mut root = x;

    while self.parent[root] != root {
      root = self.parent[root];
    }

    let mut node = x;

    while self.parent[node] != root {
      let next = self.parent[node];
      self.parent[node] = root;
      node = next;
    }

    root
  }

  fn union(&mut self, x: usize, y: usize) {
    let (root_x, root_y) = (self.find(x), self.find(y));

    if root_x == root_y {
      return;
    }

    match self.rank[root_x].cmp(&self.rank[root_y]) {
      Ordering::Less => self.parent[root_x] = root_y,
      Ordering::Greater => self.parent[root_y] = root_x,
      Ordering::Equal => {
        self.parent[root_y] = root_x;
        self.rank[root_x] += 1;
      }
    }
  }
}

#[derive(Default)]
struct Component {
  members: Vec<usize>,
  score_sum: f64,
  pairs: usize,
}

/// Group records connected by matched pairs into clusters.
///
/// Only records appearing in at least one pair are clustered. The confidence
/// of a cluster is the mean score of every pair within it, and clusters are
/// returned by descending confidence. `select_master` receives the sorted
/// members of each cluster and returns the index of its master record.
pub(crate) fn cluster<F>(size: usize, pairs: &[MatchPair], select_master: F) -> Vec<MatchCluster>
where
  F: Fn(&[usize]) -> usize,
{
  let mut forest = UnionFind::new(size);
  let pairs = pairs.iter().filter(|pair| pair.lhs < size && pair.rhs < size).collect::<Vec<_>>();

  for pair in &pairs {
    forest.union(pair.lhs, pair.rhs);
  }

  let mut components: HashMap<usize, Component> = HashMap::default();

  for pair in &pairs {
    let component = components.entry(forest.find(pair.lhs)).or_default();

    component.members.extend([pair.lhs, pair.rhs]);
    component.score_sum += pair.score;
    component.pairs += 1;
  }

  let mut clusters = components
    .into_values()
    .filter_map(|mut component| {
      component.members.sort_unstable();
      component.members.dedup();

      if component.members.len() < 2 {
        return None;
      }

      Some(MatchCluster {
        id: Uuid::new_v4().to_string(),
        master: select_master(&component.members),
        confidence: component.score_sum / component.pairs as f64,
        members: component.members,
      })
    })
    .collect::<Vec<_>>();

  clusters.sort_by(|lhs, rhs| rhs.confidence.total_cmp(&lhs.confidence).then_with(|| lhs.members[0].cmp(&rhs.members[0])));

  tracing::debug!(clusters = clusters.len(), "built match clusters");

  clusters
}
