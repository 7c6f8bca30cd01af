use eventmap_facts::FactStore;
use eventmap_model::Project;
use eventmap_render::{
    render_dot, render_json, write_json, ClusterKind, DomainGraph, EdgeKind, RenderConfig,
};

const HOTEL: &str = "Shop\\Hotel\\Domain\\Hotel";
const HOTEL_CREATED: &str = "Shop\\Hotel\\Domain\\Event\\HotelCreated";
const GUEST_CHECKED_IN: &str = "Shop\\Hotel\\Domain\\Event\\GuestCheckedIn";
const CREATE_HOTEL: &str = "Shop\\Hotel\\Application\\Command\\CreateHotel";
const CHECK_IN: &str = "Shop\\Hotel\\Application\\Command\\CheckIn";
const PROJECTION: &str = "Shop\\Hotel\\Infrastructure\\Projection\\HotelProjection";
const CONTROLLER: &str = "Shop\\Hotel\\Infrastructure\\Controller\\HotelController";
const MAILER: &str = "Shop\\Notification\\Application\\Mailer";
const SEND_MAIL: &str = "Shop\\Notification\\Application\\SendMail";
const ACCOUNT: &str = "Legacy\\Account";

fn hotel_project() -> Project {
    let jsonl = include_str!("fixtures/hotel.jsonl");
    let facts = FactStore::from_reader(jsonl.as_bytes()).expect("fixture parses");
    Project::from_facts(&facts)
}

/// Identity as it appears in DOT output
fn dot_id(identity: &str) -> String {
    format!("\"{}\"", identity.replace('\\', "\\\\"))
}

fn edge(from: &str, to: &str) -> String {
    format!("{} -> {}", dot_id(from), dot_id(to))
}

#[test]
fn graph_groups_nodes_by_context_and_aggregate() {
    let project = hotel_project();
    let graph = DomainGraph::from_project(&project);

    let contexts: Vec<_> = graph
        .clusters()
        .iter()
        .filter(|c| c.kind == ClusterKind::BoundedContext)
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(contexts, vec!["Hotel", "Notification"]);

    let hotel = &graph.clusters()[0];
    assert_eq!(hotel.children.len(), 1);
    assert_eq!(hotel.children[0].key, HOTEL);
    assert_eq!(hotel.children[0].label, "hotel");
    // two events and two commands live in the aggregate, not the context
    assert_eq!(hotel.children[0].nodes.len(), 4);

    let legacy = graph
        .clusters()
        .iter()
        .find(|c| c.key == ACCOUNT)
        .expect("context-less aggregate is still a cluster");
    assert_eq!(legacy.kind, ClusterKind::Aggregate);
}

#[test]
fn graph_edges_have_expected_directions() {
    let graph = DomainGraph::from_project(&hotel_project());

    assert_eq!(graph.targets(CREATE_HOTEL, EdgeKind::Causes), vec![HOTEL_CREATED]);
    assert_eq!(graph.targets(GUEST_CHECKED_IN, EdgeKind::Triggers), vec![PROJECTION]);
    assert_eq!(graph.targets(CONTROLLER, EdgeKind::Dispatches), vec![CREATE_HOTEL, CHECK_IN]);
    assert_eq!(graph.targets(PROJECTION, EdgeKind::ReadBy), vec![CONTROLLER]);
    assert_eq!(graph.targets("*", EdgeKind::Triggers), vec![MAILER]);
    assert_eq!(graph.targets(MAILER, EdgeKind::Issues), vec![SEND_MAIL]);
}

#[test]
fn dot_output_contains_clusters_nodes_and_edges() {
    let dot = render_dot(&hotel_project(), &RenderConfig::default());

    assert!(dot.contains("subgraph \"cluster_b_Hotel\" {"));
    assert!(dot.contains(&format!("subgraph {} {{", dot_id(&format!("cluster_a_{HOTEL}")))));
    assert!(dot.contains("bgcolor=\"#ffec99\";"));

    let created_node = format!("{} [label=\"hotel.created\"", dot_id(HOTEL_CREATED));
    assert_eq!(dot.matches(&created_node).count(), 1, "{dot}");

    assert!(dot.contains(&format!("{} [label=\"hotel_projection\", color=\"#8ce99a\"", dot_id(PROJECTION))));
    assert!(dot.contains(&format!("{} [label=\"mailer\", color=\"#e599f7\"", dot_id(MAILER))));
    assert!(dot.contains(&format!("{} [label=\"HotelController\", color=\"#dee2e6\"", dot_id(CONTROLLER))));

    for expected in [
        edge(CREATE_HOTEL, HOTEL_CREATED),
        edge(CHECK_IN, GUEST_CHECKED_IN),
        edge(GUEST_CHECKED_IN, PROJECTION),
        edge("*", MAILER),
        edge(MAILER, SEND_MAIL),
        edge(CONTROLLER, CREATE_HOTEL),
        edge(PROJECTION, CONTROLLER),
    ] {
        assert!(dot.contains(&expected), "missing edge {expected} in\n{dot}");
    }
}

#[test]
fn dot_output_is_stable() {
    let config = RenderConfig::top_down();
    let first = render_dot(&hotel_project(), &config);
    let second = render_dot(&hotel_project(), &config);

    assert_eq!(first, second);
    assert!(first.contains("rankdir=\"TB\";"));
}

#[test]
fn json_output_lists_bounded_contexts() {
    let json = render_json(&hotel_project(), true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(
        value["boundedContexts"]["Hotel"]["userInterfaces"],
        serde_json::json!([CONTROLLER])
    );
    assert_eq!(
        value["userInterfaces"][CONTROLLER]["commands"],
        serde_json::json!([CREATE_HOTEL, CHECK_IN])
    );
    assert_eq!(value["subscribers"][MAILER]["events"], serde_json::json!(["*"]));
    assert!(value["aggregates"][ACCOUNT].is_object());
}

#[test]
fn json_written_to_file_matches_rendered_string() {
    let project = hotel_project();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");

    let file = std::fs::File::create(&path).unwrap();
    write_json(std::io::BufWriter::new(file), &project, true).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_json(&project, true).unwrap());
}

#[test]
fn config_loaded_from_file_drives_dot_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("render.toml");
    std::fs::write(&path, "rank_direction = \"BT\"\n\n[palette]\nevent = \"#123456\"\n").unwrap();

    let config = RenderConfig::load(&path).unwrap();
    let dot = render_dot(&hotel_project(), &config);

    assert!(dot.contains("rankdir=\"BT\";"));
    assert!(dot.contains(&format!("{} [label=\"hotel.created\", color=\"#123456\"", dot_id(HOTEL_CREATED))));
}
