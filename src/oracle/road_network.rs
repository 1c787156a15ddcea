use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{Error, OracleError, Result};
use crate::models::{Coordinate, Distance};
use crate::oracle::{DistanceOracle, TravelMode};

/// Road network graph answering driving distances between coordinates
///
/// Locations are snapped to their nearest road vertex. The distance of a leg is
/// the snap distance at the origin, the shortest path through the network and
/// the snap distance at the destination, all in meters.
pub struct RoadNetworkOracle {
    graph: DiGraph<Coordinate, Distance>,
    vertex_index: HashMap<u64, NodeIndex>,
}

impl RoadNetworkOracle {
    /// Create a road network from vertices (id -> position) and edges (from, to, one way)
    ///
    /// Two-way edges are added in both directions. Edges referring to unknown
    /// vertices are skipped.
    pub fn new(vertices: HashMap<u64, Coordinate>, edges: Vec<(u64, u64, bool)>) -> Self {
        let mut graph = DiGraph::with_capacity(vertices.len(), edges.len() * 2);

        // Insert in id order so node indices do not depend on hash order
        let mut ids: Vec<u64> = vertices.keys().copied().collect();
        ids.sort_unstable();
        let vertex_index: HashMap<u64, NodeIndex> = ids
            .into_iter()
            .map(|id| (id, graph.add_node(vertices[&id])))
            .collect();

        let mut skipped = 0;
        for (from, to, one_way) in edges {
            let (Some(&a), Some(&b)) = (vertex_index.get(&from), vertex_index.get(&to)) else {
                skipped += 1;
                continue;
            };
            let length = graph[a].haversine_to(&graph[b]);
            graph.add_edge(a, b, length);
            if !one_way {
                graph.add_edge(b, a, length);
            }
        }
        if skipped > 0 {
            tracing::warn!("Skipped {} road edges with unknown vertices", skipped);
        }

        Self {
            graph,
            vertex_index,
        }
    }

    /// Loads `id lon lat` vertex lines and `id from to [oneway]` edge lines
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(vertices: P, edges: Q) -> Result<Self> {
        let vertices = load_road_vertices(vertices.as_ref())?;
        tracing::info!("Loaded {} road vertices", vertices.len());

        let edges = load_road_edges(edges.as_ref())?;
        tracing::info!("Loaded {} roads", edges.len());

        Ok(Self::new(vertices, edges))
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Find the nearest road vertex to a given location
    fn find_nearest_vertex(&self, location: &Coordinate) -> Option<NodeIndex> {
        self.graph
            .node_indices()
            .min_by(|&a, &b| {
                let da = self.graph[a].planar_distance_to(location);
                let db = self.graph[b].planar_distance_to(location);
                da.total_cmp(&db)
            })
    }

    /// Shortest path length between two vertices, None when unreachable
    fn shortest_path_distance(&self, start: NodeIndex, end: NodeIndex) -> Option<Distance> {
        if start == end {
            return Some(0.0);
        }
        dijkstra(&self.graph, start, Some(end), |edge| *edge.weight())
            .get(&end)
            .copied()
    }

    #[cfg(test)]
    fn vertex(&self, id: u64) -> Option<NodeIndex> {
        self.vertex_index.get(&id).copied()
    }
}

impl DistanceOracle for RoadNetworkOracle {
    type Location = Coordinate;

    fn distance(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        _mode: TravelMode,
    ) -> std::result::Result<Distance, OracleError> {
        if origin == destination {
            return Ok(0.0);
        }

        let no_route = || OracleError::no_route(origin, destination);
        let start = self.find_nearest_vertex(origin).ok_or_else(no_route)?;
        let end = self.find_nearest_vertex(destination).ok_or_else(no_route)?;

        let network = self
            .shortest_path_distance(start, end)
            .ok_or_else(no_route)?;

        let access = origin.haversine_to(&self.graph[start]);
        let egress = self.graph[end].haversine_to(destination);

        Ok(access + network + egress)
    }
}

fn parse_field<T: std::str::FromStr>(
    value: &str,
    source_name: &Path,
    line: usize,
) -> Result<T> {
    value.parse::<T>().map_err(|_| Error::Parse {
        source_name: source_name.display().to_string(),
        line,
        reason: format!("cannot parse field '{}'", value),
    })
}

// Load road vertex data
fn load_road_vertices(path: &Path) -> Result<HashMap<u64, Coordinate>> {
    let reader = io::BufReader::new(File::open(path)?);
    let mut vertices = HashMap::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 3 {
            return Err(Error::Parse {
                source_name: path.display().to_string(),
                line: number + 1,
                reason: "expected 'id longitude latitude'".to_string(),
            });
        }

        let id = parse_field::<u64>(parts[0], path, number + 1)?;
        let longitude = parse_field::<f64>(parts[1], path, number + 1)?;
        let latitude = parse_field::<f64>(parts[2], path, number + 1)?;

        vertices.insert(id, Coordinate::new(latitude, longitude));
    }

    Ok(vertices)
}

// Load road edge data
fn load_road_edges(path: &Path) -> Result<Vec<(u64, u64, bool)>> {
    let reader = io::BufReader::new(File::open(path)?);
    let mut edges = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }
        if parts.len() < 3 {
            return Err(Error::Parse {
                source_name: path.display().to_string(),
                line: number + 1,
                reason: "expected 'id from to [oneway]'".to_string(),
            });
        }

        let from = parse_field::<u64>(parts[1], path, number + 1)?;
        let to = parse_field::<u64>(parts[2], path, number + 1)?;
        let one_way = parts.get(3).map_or(false, |flag| *flag == "1");

        edges.push((from, to, one_way));
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // Three vertices on the equator, 0.01 degree apart, plus an island vertex
    fn create_test_network() -> RoadNetworkOracle {
        let vertices = HashMap::from([
            (1, Coordinate::new(0.0, 0.0)),
            (2, Coordinate::new(0.0, 0.01)),
            (3, Coordinate::new(0.0, 0.02)),
            (4, Coordinate::new(1.0, 1.0)),
        ]);
        let edges = vec![(1, 2, false), (2, 3, true), (3, 99, false)];
        RoadNetworkOracle::new(vertices, edges)
    }

    #[test]
    fn test_graph_shape() {
        let network = create_test_network();

        assert_eq!(network.vertex_count(), 4);
        assert_eq!(network.edge_count(), 3);
    }

    #[test]
    fn test_one_way_street_is_directed() {
        let network = create_test_network();
        let a = Coordinate::new(0.0, 0.0);
        let c = Coordinate::new(0.0, 0.02);

        let forward = network.distance(&a, &c, TravelMode::Driving).unwrap();
        assert!((forward - a.haversine_to(&c)).abs() < 1.0, "{}", forward);

        assert!(matches!(
            network.distance(&c, &a, TravelMode::Driving),
            Err(OracleError::NoRouteFound { .. })
        ));
    }

    #[test]
    fn test_disconnected_vertex() {
        let network = create_test_network();

        assert!(network
            .distance(
                &Coordinate::new(0.0, 0.0),
                &Coordinate::new(1.0, 1.0),
                TravelMode::Driving
            )
            .is_err());
    }

    #[test]
    fn test_snap_distance_added() {
        let network = create_test_network();
        let off_road = Coordinate::new(0.001, 0.0);
        let on_road = Coordinate::new(0.0, 0.01);

        let distance = network
            .distance(&off_road, &on_road, TravelMode::Driving)
            .unwrap();
        let expected = off_road.haversine_to(&Coordinate::new(0.0, 0.0))
            + Coordinate::new(0.0, 0.0).haversine_to(&on_road);
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn test_same_vertex_is_free() {
        let network = create_test_network();
        let v = network.vertex(2).unwrap();

        assert_eq!(network.shortest_path_distance(v, v), Some(0.0));
    }

    #[test]
    fn test_from_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let vertices_path = dir.path().join("RoadVertices.txt");
        let edges_path = dir.path().join("RoadEdges.txt");

        let mut vertices = File::create(&vertices_path).unwrap();
        writeln!(vertices, "1 4.8900 52.3700").unwrap();
        writeln!(vertices, "2 4.9000 52.3700").unwrap();
        let mut edges = File::create(&edges_path).unwrap();
        writeln!(edges, "10 1 2").unwrap();

        let network = RoadNetworkOracle::from_files(&vertices_path, &edges_path).unwrap();
        assert_eq!(network.vertex_count(), 2);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn test_malformed_vertex_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let vertices_path = dir.path().join("RoadVertices.txt");
        let edges_path = dir.path().join("RoadEdges.txt");
        std::fs::write(&vertices_path, "1 east 52.37\n").unwrap();
        std::fs::write(&edges_path, "").unwrap();

        let error = RoadNetworkOracle::from_files(&vertices_path, &edges_path)
            .err()
            .unwrap();
        assert!(matches!(error, Error::Parse { line: 1, .. }));
    }
}
