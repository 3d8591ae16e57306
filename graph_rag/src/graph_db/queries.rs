//! Cypher used against the location graph.

/// No ORDER BY: which rows survive the LIMIT is up to the database.
pub const SEARCH_LOCATIONS: &str = "\
MATCH (l:Location)
WHERE toLower(l.name) CONTAINS toLower($query) OR toLower(l.description) CONTAINS toLower($query)
RETURN l.id AS id, l.name AS name, l.description AS description
LIMIT $limit";

pub const LOCATION_CONSTRAINT: &str =
    "CREATE CONSTRAINT IF NOT EXISTS FOR (l:Location) REQUIRE l.id IS UNIQUE";

/// Syntax accepted by Neo4j 4.x servers.
pub const LEGACY_LOCATION_CONSTRAINT: &str =
    "CREATE CONSTRAINT IF NOT EXISTS ON (l:Location) ASSERT l.id IS UNIQUE";

pub const MERGE_LOCATION: &str = "\
MERGE (l:Location {id: $id})
SET l.name = $name, l.lat = $lat, l.lon = $lon, l.description = $description, l.tags = $tags";

pub const FETCH_LOCATIONS: &str =
    "MATCH (l:Location) RETURN l.id AS id, l.name AS name, l.description AS description LIMIT $limit";

pub const FETCH_LOCATION_EDGES: &str =
    "MATCH (a:Location)-[r]->(b:Location) RETURN a.id AS a, b.id AS b, type(r) AS type LIMIT $limit";
