use std::collections::{HashSet, VecDeque};

/// Neighbour lists of a graph whose sites are addressed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// A graph of `len` sites without edges.
    pub fn new(len: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Adds the directed arc `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is out of bounds.
    pub fn add_arc(&mut self, from: usize, to: usize) {
        self.neighbors[from].push(to);
    }

    /// Adds an undirected edge between `a` and `b`.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        self.add_arc(a, b);
        self.add_arc(b, a);
    }

    pub fn neighbors(&self, site: usize) -> &[usize] {
        &self.neighbors[site]
    }

    /// Unweighted shortest-path lengths from `source` to each of `targets`.
    ///
    /// Breadth-first search over the whole graph, stopping as soon as every target has been
    /// reached. Unreachable targets map to `None`. The result is aligned with `targets`.
    pub fn shortest_path_lengths(&self, source: usize, targets: &[usize]) -> Vec<Option<usize>> {
        let mut distances: Vec<Option<usize>> = vec![None; self.len()];
        distances[source] = Some(0);

        let mut pending = targets
            .iter()
            .filter(|&&target| target != source)
            .collect::<HashSet<_>>()
            .len();

        let mut queue = VecDeque::from([source]);
        while pending > 0 {
            let Some(site) = queue.pop_front() else {
                break;
            };
            let next = distances[site].map(|d| d + 1);
            for &neighbor in &self.neighbors[site] {
                if distances[neighbor].is_some() {
                    continue;
                }
                distances[neighbor] = next;
                if targets.contains(&neighbor) {
                    pending -= 1;
                }
                queue.push_back(neighbor);
            }
        }

        targets.iter().map(|&target| distances[target]).collect()
    }

    /// Sites reachable from `start`, including `start` itself.
    pub fn reachable_from(&self, start: usize) -> Vec<bool> {
        let mut visited = vec![false; self.len()];
        visited[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(site) = queue.pop_front() {
            for &neighbor in &self.neighbors[site] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        visited
    }
}
