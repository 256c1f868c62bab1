//! Reference graphs with known degree statistics.
//!
//! Each fixture is an edge list in the comma-separated format read by the
//! edge-list provider: one edge per line, one vertex id per endpoint slot.

/// Percentiles used by the reference distributions.
pub const REFERENCE_PERCENTILES: [f64; 5] = [0.0, 20.0, 50.0, 70.0, 100.0];

/// A fixture graph and its expected statistics.
#[derive(Clone, Copy, Debug)]
pub struct GraphFixture {
    /// Short name of the fixture.
    pub name: &'static str,
    /// Edge-list text.
    pub edges: &'static str,
    /// Number of vertices the text describes.
    pub vertices: u64,
    /// Expected degree of every vertex, ascending.
    pub sorted_degrees: &'static [u64],
    /// Expected histogram at [`REFERENCE_PERCENTILES`].
    pub distribution: [u64; 5],
    /// Expected maximum allowed binary degree.
    pub max_allowed_degree: u64,
}

/// Ten vertices joined by plain binary edges.
pub const BINARY_GRAPH: GraphFixture = GraphFixture {
    name: "binary",
    edges: "\
# ring with two chords
v1,v2
v2,v3
v3,v4
v4,v5
v5,v6
v6,v7
v7,v8
v8,v9
v9,v10
v1,v10
v3,v8
",
    vertices: 10,
    sorted_degrees: &[2, 2, 2, 2, 2, 2, 2, 2, 3, 3],
    distribution: [2, 2, 2, 2, 3],
    max_allowed_degree: 9,
};

/// Ten vertices with degrees `{1,1,2,2,2,2,2,2,3,3}`.
pub const PATH_GRAPH: GraphFixture = GraphFixture {
    name: "paths",
    edges: "\
v1,v2
v2,v3
v3,v4
v3,v5
v5,v6
v7,v8
v8,v9
v9,v10
v9,v7
v10,v4
",
    vertices: 10,
    sorted_degrees: &[1, 1, 2, 2, 2, 2, 2, 2, 3, 3],
    distribution: [1, 2, 2, 2, 3],
    max_allowed_degree: 9,
};

/// Ten vertices including two self-loops, each counted twice.
pub const LOOP_GRAPH: GraphFixture = GraphFixture {
    name: "loops",
    edges: "\
v1,v1
v1,v2
v1,v3
v3,v4
v4,v4
v6,v4
v6,v5
v6,v7
v8,v7
v8,v9
v8,v10
v9,v10
",
    vertices: 10,
    sorted_degrees: &[1, 1, 2, 2, 2, 2, 3, 3, 4, 4],
    distribution: [1, 2, 2, 3, 4],
    max_allowed_degree: 11,
};

/// Every reference graph.
pub const ALL_GRAPHS: [GraphFixture; 3] = [BINARY_GRAPH, PATH_GRAPH, LOOP_GRAPH];

/// Schema document for people, companies and employment.
pub const EMPLOYMENT_SCHEMA_YAML: &str = "\
entities:
  person:
    owns: [name, age]
    plays: [\"employment:employee\", \"friendship:friend\"]
  company:
    owns: [name]
    plays: [\"employment:employer\"]
relations:
  employment:
    relates: [employee, employer]
    owns: [start-date]
  friendship:
    relates: [friend]
attributes:
  name:
    value: string
  age:
    value: long
  start-date:
    value: datetime
";

/// Data document matching [`EMPLOYMENT_SCHEMA_YAML`].
///
/// Four people and two companies; `alice` and `bob` are employed, `carol` is
/// friends with herself, and `dave` is isolated.
pub const EMPLOYMENT_DATA_YAML: &str = "\
things:
  - { id: alice, type: person }
  - { id: bob, type: person }
  - { id: carol, type: person }
  - { id: dave, type: person }
  - { id: acme, type: company }
  - { id: globex, type: company }
  - { id: alice-name, type: name, value: Alice }
  - { id: acme-name, type: name, value: Acme }
relations:
  - id: e1
    type: employment
    players:
      - { role: employee, player: alice }
      - { role: employer, player: acme }
  - id: e2
    type: employment
    players:
      - { role: employee, player: bob }
      - { role: employer, player: acme }
  - id: f1
    type: friendship
    players:
      - { role: friend, player: carol }
      - { role: friend, player: carol }
ownerships:
  - { owner: alice, attribute: alice-name }
  - { owner: acme, attribute: acme-name }
";
