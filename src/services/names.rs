//! Display names for participants who join without one.

use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "Amber", "Brave", "Calm", "Daring", "Eager", "Fuzzy", "Gentle", "Happy", "Idle", "Jolly", "Keen", "Lucky", "Mellow",
    "Nimble", "Odd", "Proud", "Quiet", "Rapid", "Sly", "Tidy", "Upbeat", "Vivid", "Witty", "Zesty",
];

const ANIMALS: &[&str] = &[
    "Badger", "Crane", "Dingo", "Egret", "Ferret", "Gecko", "Heron", "Ibis", "Jackal", "Koala", "Lynx", "Marmot",
    "Newt", "Otter", "Puffin", "Quail", "Raven", "Stoat", "Tapir", "Urchin", "Vole", "Walrus", "Yak", "Zebra",
];

/// Random "Adjective Animal" pair, e.g. `"Quiet Otter"`.
#[must_use]
pub fn generate_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let animal = ANIMALS[rng.random_range(0..ANIMALS.len())];
    format!("{adjective} {animal}")
}

/// Use the requested name when it has visible characters, otherwise generate one.
#[must_use]
pub fn resolve_name(requested: Option<&str>) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => generate_name(),
    }
}
