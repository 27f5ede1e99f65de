//! Settlement name generation
//!
//! Names are built from a terrain prefix and either a terrain suffix
//! ("Greenfield") or a settlement-type suffix ("Green Farm"). Ruins take the
//! name of the place they used to be.

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::SettlementType;
use crate::terrain::TerrainType;

/// Chance of using a settlement-type suffix instead of a terrain suffix.
const TYPE_SUFFIX_CHANCE: f64 = 0.4;

/// Chance that a coastal settlement is named for the water instead of its land.
const SHORE_NAME_CHANCE: f64 = 0.5;

// ============================================================================
// TERRAIN PREFIXES
// ============================================================================

const PLAINS_PREFIXES: &[&str] = &[
    "Green", "Golden", "Fair", "Old", "New", "Dead Man", "Dry", "Raining", "Thunder", "Bandit",
    "Broad", "Rich", "High", "Clear", "Tall", "Wide", "Long", "Open", "Great", "Boundless",
    "Saw", "Reed", "Thatch", "Wheat", "Barley", "Rye", "Grass", "Steppe", "Prairie", "Clover",
    "Heather", "Ash", "Oak", "Elm", "Alder", "Willow", "Beech", "Birch", "Maple", "Hazel",
    "Deer", "Hart", "Stag", "Elk", "Ox", "Bull", "Wolf", "Jackal", "Hound", "Hare", "Fox",
    "Snake", "Viper", "Serpent", "Lark", "Hawk", "Bison", "Horse", "Raven", "Crow", "East",
    "West", "North", "South", "Dawn", "Sunset", "Midday", "Star", "Sun", "Bright", "Blue",
    "Wind", "Storm", "Mana", "Withered", "Shadow", "Giant", "Fey", "Blood", "Ghost", "Wraith",
    "Traveler's", "Lost", "Forsaken",
];

const FOREST_PREFIXES: &[&str] = &[
    "Deep", "Dark", "Green", "Wild", "Hidden", "Lost", "Ancient", "Whispering", "Shadow",
    "Elder", "Wolf", "Boar", "Stag", "Hunter's", "Fey", "Spider", "Serpent", "Owl", "Raven",
    "Crow", "Thorn", "Briar", "Ash", "Oak", "Elm", "Alder", "Willow", "Beech", "Birch", "Maple",
    "Hazel", "Dead Man's", "Cursed", "Haunted", "Moon", "Star", "Sun", "Storm", "Misty",
    "Foggy", "Enchanted", "Dragon", "Goblin", "Bandit", "Witch", "Withered", "Gnarled",
    "Silent", "Burning", "Blood",
];

const HILLS_PREFIXES: &[&str] = &[
    "High", "Stone", "Wind", "Rolling", "Bright", "Crown", "Eagle", "Hawk", "Raven", "Wolf",
    "Fox", "Boar", "Deer", "Stag", "Serpent", "Dragon", "Storm", "Thunder", "Sunset", "Dawn",
    "Moon", "Star", "Grass", "Heather", "Briar", "Thorn", "Ash", "Oak", "Elm", "Willow",
    "Beech", "Birch", "Maple", "Hazel", "Iron", "Silver", "Gold", "Copper", "Bronze", "Cursed",
    "Lost", "Haunted", "Fey", "Withered", "Traveler's", "Old", "New",
];

const MOUNTAINS_PREFIXES: &[&str] = &[
    "Iron", "Stone", "Peak", "Ridge", "Snow", "Storm", "Dragon", "Thunder", "Lightning",
    "Cloud", "Grim", "Dark", "Shadow", "Frost", "Ice", "Frozen", "Fire", "Ash", "Blood",
    "Skull", "Dead Man's", "Cursed", "Haunted", "Dwarven", "Giant", "Goblin", "Orc", "Troll",
    "Wraith", "Wolf", "Eagle", "Hawk", "Raven", "Vulture", "Serpent", "Wyrm", "Silver", "Gold",
    "Copper", "Crystal", "Gem", "Star", "Moon", "Sun", "Dawn", "Dusk", "Forsaken", "Broken",
    "Shattered", "Withered", "Ancient",
];

const WATER_PREFIXES: &[&str] = &[
    "River", "Lake", "Ford", "Bridge", "Harbor", "Bay", "Shore", "Salt", "Deep", "Dark", "Blue",
    "Green", "Black", "Silver", "Golden", "Crystal", "Frozen", "Storm", "Thunder", "Lightning",
    "Whirlpool", "Foam", "Mist", "Fog", "Moon", "Sun", "Star", "Tide", "Wave", "Dragon",
    "Serpent", "Kraken", "Leviathan", "Mermaid's", "Siren's", "Pirate's", "Fisher's",
    "Dead Man's", "Cursed", "Haunted", "Lost", "Forgotten", "Ancient", "Fey", "Mana",
    "Withered",
];

const DESERT_PREFIXES: &[&str] = &[
    "Sand", "Sun", "Dry", "Lost", "Mirage", "Bone", "Dune", "Ash", "Scorch", "Red", "Glass",
    "Dust", "Stone", "Salt", "Cracked", "Burning", "Blistering", "Dead", "Forsaken", "Cursed",
    "Haunted", "Phantom", "Ghost", "Wraith", "Nomad's", "Traveler's", "Lost Man's", "Serpent",
    "Scorpion", "Viper", "Jackal", "Hyena", "Buzzard", "Oasis", "Well", "Spring", "Moon",
    "Sunset", "Dawn", "Star", "Ancient", "Withered", "Shattered", "Bleached", "Bonewhite",
];

// ============================================================================
// TERRAIN SUFFIXES
// ============================================================================

const PLAINS_SUFFIXES: &[&str] = &[
    "field", "meadow", "haven", "vale", "stead", "moor", "lea", "flat", "pasture", "heath",
    "acre", "croft", "down", "plain", "steppe", "wold", "reach", "ward", "bank", "steadings",
    "pastoral", "farm", "lands", "commons", "ham", "wick", "bury", "holm", "gard", "steadholm",
    "holt", "staddle", "glebe", "hollow", "park", "ranch", "grange", "manor", "run",
    "steadwell", "town", "steadgate", "low", "rise", "furlong", "outlands", "fen", "knoll",
    "brae",
];

const FOREST_SUFFIXES: &[&str] = &[
    "wood", "grove", "glade", "hollow", "thicket", "brake", "shaw", "copse", "holt", "spinney",
    "boscage", "chase", "frith", "den", "hurst", "shawden", "glens", "shade", "clearing",
    "stand", "timber", "wilds", "warren", "burrow", "dell", "fen", "marshwood", "briar",
    "thornwood", "hedge", "mire", "holtwood", "lair", "fallow", "watch", "fastness",
    "woodlands", "brambles", "overgrowth", "roots", "underwood", "deepwood", "sylva",
    "groveland", "twilight", "sward", "feywood", "elderwood",
];

const HILLS_SUFFIXES: &[&str] = &[
    "hill", "ridge", "crest", "tor", "mount", "down", "fell", "barrow", "knoll", "tump", "brae",
    "bluff", "escarp", "rise", "heights", "slopes", "crag", "ledge", "overlook", "scaur",
    "rock", "stones", "head", "copsehill", "dun", "fort", "butte", "mound", "knap", "cairn",
    "watch", "seat", "brow", "slope", "cliff", "perch", "spine", "outcrop", "ridgeway",
    "upland", "heaf", "drift", "uplift", "ledgehold", "wildrise", "torfell", "ridgehold",
    "barrows", "summit",
];

const MOUNTAINS_SUFFIXES: &[&str] = &[
    "peak", "fell", "crag", "stone", "hold", "gate", "pass", "spire", "pinnacle", "ridge",
    "summit", "crown", "crest", "horn", "head", "fang", "tooth", "spiregate", "tor", "berg",
    "rock", "buttress", "fastness", "fort", "bastion", "citadel", "keep", "dome", "spirehold",
    "spirefell", "highlands", "palisade", "spirewall", "rampart", "overlook", "ridgekeep",
    "barrier", "heights", "massif", "wildpeak", "gatecrag", "mount", "spirestone", "ridgefort",
    "stonewall", "frosthold", "stormpeak", "dragonspire", "ancienthold",
];

const WATER_SUFFIXES: &[&str] = &[
    "ford", "bridge", "port", "bay", "crossing", "mouth", "dock", "wharf", "harbor", "haven",
    "jetty", "quay", "marsh", "lagoon", "estuary", "delta", "inlet", "gulf", "loch", "mere",
    "brook", "stream", "run", "falls", "cascade", "spring", "fountain", "rapids", "shoals",
    "pool", "reach", "channel", "strait", "current", "deep", "shallows", "sands", "beach",
    "shore", "cliffs", "isle", "islet", "atoll", "reef", "sound", "flow", "wash", "drift",
];

const DESERT_SUFFIXES: &[&str] = &[
    "well", "springs", "rest", "sanctuary", "refuge", "shade", "rock", "gulch", "dune", "waste",
    "expanse", "flat", "salt", "basin", "sink", "pan", "gorge", "bluff", "cliff", "ridge",
    "hearth", "outcrop", "oasis", "mirage", "mirrors", "winds", "sunlands", "glass", "burn",
    "crust", "sands", "dunes", "stone", "drylands", "steppe", "arid", "lowlands", "scarp",
    "barren", "scour", "ravine", "scrub", "drought", "ash", "ashes", "hollow", "scar", "spire",
    "fane", "bones",
];

// ============================================================================
// SETTLEMENT TYPE SUFFIXES
// ============================================================================

const FARMSTEAD_NAMES: &[&str] = &[
    "Farm", "Stead", "Homestead", "Ranch", "Croft", "Holding", "Pasture", "Barn", "Fold",
    "Paddock", "Stable", "Grange", "Byre", "Outstead", "Tillage", "Dairy", "Fieldstead",
    "Sheepfold", "Haystead", "Granary", "Millstead", "Thresh", "Piggeries", "Manorstead",
    "Oxstead", "Cartstead", "Ploughstead", "Cottage", "Lodge", "Lean-to", "Ham", "Acrestead",
    "Yard", "Garth", "Byfarm", "Longstead", "Roodstead", "Shieling", "Shedstead", "Hearthstead",
    "Penstead", "Hovel", "House", "Hallstead", "Kraal", "Outpost", "Steading", "Stableyard",
];

const HAMLET_NAMES: &[&str] = &[
    "Hamlet", "Grove", "Glen", "Corner", "Thorp", "Hame", "Nook", "Clachan", "Crook", "Cot",
    "Cote", "Fold", "End", "Row", "Cross", "Wick", "Wich", "Heath", "Lea", "Brook", "Beck",
    "Hollow", "Sted", "Ness", "Croft", "Barrow", "Bend", "Dale", "Holm", "Stead", "Yard",
    "Pightle", "Hill", "Lane", "Mere", "Marsh", "Fen", "Mead", "Low", "Edge", "Green", "Drift",
    "Ridge", "Nest", "Shade", "Gate", "Leys", "Wood",
];

const VILLAGE_NAMES: &[&str] = &[
    "Village", "Borough", "Green", "Commons", "Ton", "Sted", "Wick", "Worth", "Wich", "Ford",
    "Ham", "Ferry", "Market", "Yard", "Field", "Lea", "Thwaite", "Kirk", "Minster", "Ness",
    "Brook", "Beck", "Pool", "Well", "Cross", "Howe", "Row", "Hill", "Holt", "Shaw", "Wood",
    "Hatch", "Bridge", "Fell", "Barrow", "Stone", "Gate", "Wall", "Hall", "Stead", "Croft",
    "Holme", "Dale", "Down", "Bend", "Spring", "Burn", "Grange",
];

const TOWN_NAMES: &[&str] = &[
    "Town", "Market", "Cross", "Mills", "Gate", "Bridge", "Ford", "Port", "Bay", "Harbor",
    "Yard", "Hall", "Square", "Circle", "Court", "Road", "Row", "Street", "Well", "Fountain",
    "Tower", "Keep", "Stone", "Wall", "Watch", "House", "Temple", "Church", "Guild", "Exchange",
    "Mint", "Bazaar", "Dock", "Quay", "Wharf", "Fort", "Castle", "Depot", "Granary", "Vault",
    "Barracks", "Arena", "Theatre", "Garden", "Manor", "Ward", "Quarter", "Plaza",
];

const CITY_NAMES: &[&str] = &[
    "City", "Keep", "Hold", "Fortress", "Citadel", "Castle", "Bastion", "Stronghold",
    "Palisade", "Bulwark", "Dome", "Hall", "Tower", "Gate", "Spire", "Temple", "Shrine",
    "Cathedral", "Vault", "Forum", "Market", "Exchange", "Court", "Palace", "Sanctum", "Arena",
    "Theatre", "Colonnade", "Bridge", "Aqueduct", "Wall", "Arch", "Citadelgate", "Highhall",
    "Stonegate", "Keepgate", "Ward", "Quarter", "Circle", "Square", "Manor", "Guildhall",
    "Library", "Archive", "Observatory", "Monument", "Obelisk", "Colossus",
];

const LOGGING_CAMP_NAMES: &[&str] = &[
    "Camp", "Lodge", "Mill", "Clearing", "Cabin", "Hut", "Shanty", "Shack", "Bunkhouse", "Yard",
    "Depot", "Timberyard", "Sawpit", "Sawmill", "Stump", "Coppice", "Hold", "Hutment",
    "Lean-to", "Campstead", "Outcamp", "Logstead", "Woodpile", "Stockpile", "Millstead", "Fell",
    "Notch", "Grove", "Trailhead", "Firebreak", "Palisade", "Fort", "Gate", "Landing", "Dock",
    "Ramp", "Trestle", "Bridge", "Road", "Track", "Path", "Lumberyard", "Backcut", "Crosscut",
    "Shingle", "Chopstead", "Cleaver", "Splitter",
];

const MINING_CAMP_NAMES: &[&str] = &[
    "Mine", "Quarry", "Delve", "Shaft", "Pit", "Tunnel", "Drift", "Stope", "Gallery", "Face",
    "Cut", "Diggings", "Spoil", "Tailings", "Heap", "Workings", "Forge", "Smelter", "Foundry",
    "Mint", "Orehouse", "Store", "Depot", "Camp", "Hollow", "Chasm", "Cleft", "Clough",
    "Crevasse", "Adits", "Cave", "Grotto", "Vault", "Chamber", "Hall", "Forgegate", "Hammer",
    "Anvil", "Smokeworks", "Ironworks", "Copperworks", "Goldstead", "Silverstead", "Coalpit",
    "Stonecut", "Rockbreak", "Orestead", "Deepstead",
];

const MONASTERY_NAMES: &[&str] = &[
    "Abbey", "Monastery", "Priory", "Sanctuary", "Hermitage", "Chapel", "Cloister", "Shrine",
    "Temple", "Church", "Basilica", "Cathedral", "Convent", "Friary", "Oratory", "Minster",
    "Parish", "Chapterhouse", "Hospice", "Sacristy", "Sanctum", "Reliquary", "Hall", "Altar",
    "Crypt", "Catacomb", "Mausoleum", "Shrinehold", "Refuge", "Retreat", "Sanctuarygate",
    "Pilgrimage", "Processional", "Choir", "Choirhouse", "Liturgy", "Prayerhall", "Scriptorium",
    "Sacredwell", "Blessing", "Font", "Holywell", "Martyrstead", "Angelspire", "Saintstead",
    "Relicstead", "Reliquaryhall", "Penance",
];

const WATCHTOWER_NAMES: &[&str] = &[
    "Watch", "Tower", "Guard", "Beacon", "Keep", "Turret", "Spire", "Fort", "Fortlet",
    "Lookout", "Overlook", "Bastion", "Bulwark", "Outpost", "Signal", "Bell", "Drum", "Fire",
    "Torch", "Light", "Lighthouse", "Lantern", "Pharos", "Citadel", "Garrison", "Blockhouse",
    "Redoubt", "Palisade", "Stockade", "Wall", "Rampart", "Barbican", "Portcullis", "Gate",
    "Arch", "Gatehouse", "Fortress", "Guardhouse", "Barracks", "Defile", "Sentinel", "Cairn",
    "Monolith", "Obelisk", "Marker", "Pillar", "Post", "Stone",
];

fn prefixes(terrain: TerrainType) -> &'static [&'static str] {
    match terrain {
        TerrainType::Plains => PLAINS_PREFIXES,
        TerrainType::Forest => FOREST_PREFIXES,
        TerrainType::Hills => HILLS_PREFIXES,
        TerrainType::Mountains => MOUNTAINS_PREFIXES,
        TerrainType::Water => WATER_PREFIXES,
        TerrainType::Desert => DESERT_PREFIXES,
    }
}

fn terrain_suffixes(terrain: TerrainType) -> &'static [&'static str] {
    match terrain {
        TerrainType::Plains => PLAINS_SUFFIXES,
        TerrainType::Forest => FOREST_SUFFIXES,
        TerrainType::Hills => HILLS_SUFFIXES,
        TerrainType::Mountains => MOUNTAINS_SUFFIXES,
        TerrainType::Water => WATER_SUFFIXES,
        TerrainType::Desert => DESERT_SUFFIXES,
    }
}

fn type_suffixes(kind: SettlementType) -> Option<&'static [&'static str]> {
    match kind {
        SettlementType::Farmstead => Some(FARMSTEAD_NAMES),
        SettlementType::Hamlet => Some(HAMLET_NAMES),
        SettlementType::Village => Some(VILLAGE_NAMES),
        SettlementType::Town => Some(TOWN_NAMES),
        SettlementType::City => Some(CITY_NAMES),
        SettlementType::LoggingCamp => Some(LOGGING_CAMP_NAMES),
        SettlementType::MiningCamp => Some(MINING_CAMP_NAMES),
        SettlementType::Monastery => Some(MONASTERY_NAMES),
        SettlementType::Watchtower => Some(WATCHTOWER_NAMES),
        SettlementType::RuinsVillage | SettlementType::RuinsKeep | SettlementType::AncientRuins => None,
    }
}

/// Number of distinct prefix/suffix pairs available on a terrain, ignoring
/// type suffixes.
pub fn combinations(terrain: TerrainType) -> usize {
    prefixes(terrain).len() * terrain_suffixes(terrain).len()
}

/// Generate a settlement name.
pub fn settlement_name(
    kind: SettlementType,
    terrain: TerrainType,
    coastal: bool,
    rng: &mut impl Rng,
) -> String {
    let terrain = if coastal && rng.gen_bool(SHORE_NAME_CHANCE) {
        TerrainType::Water
    } else {
        terrain
    };

    if kind.is_ruin() {
        return format!("Ruins of {}", place_name(terrain, rng));
    }

    match type_suffixes(kind) {
        Some(suffixes) if rng.gen_bool(TYPE_SUFFIX_CHANCE) => {
            let prefix = pick(prefixes(terrain), rng);
            let suffix = pick(suffixes, rng);
            format!("{} {}", prefix, suffix)
        }
        _ => place_name(terrain, rng),
    }
}

/// Prefix joined to a terrain suffix: "Greenfield", "Dead Man's Hollow".
fn place_name(terrain: TerrainType, rng: &mut impl Rng) -> String {
    let prefix = pick(prefixes(terrain), rng);
    let suffix = pick(terrain_suffixes(terrain), rng);
    if prefix.contains(' ') || prefix.ends_with("'s") {
        format!("{} {}", prefix, capitalize(suffix))
    } else {
        format!("{}{}", prefix, suffix)
    }
}

fn pick(pool: &'static [&'static str], rng: &mut impl Rng) -> &'static str {
    pool.choose(rng).copied().unwrap_or("Nowhere")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pools_are_large() {
        for terrain in TerrainType::ALL {
            assert!(combinations(terrain) >= 1000, "{} pool too small", terrain);
        }
    }

    #[test]
    fn test_names_are_deterministic() {
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(
                settlement_name(SettlementType::Village, TerrainType::Hills, false, &mut a),
                settlement_name(SettlementType::Village, TerrainType::Hills, false, &mut b)
            );
        }
    }

    #[test]
    fn test_ruins_are_named_after_a_place() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let name = settlement_name(SettlementType::RuinsKeep, TerrainType::Mountains, false, &mut rng);
            assert!(name.starts_with("Ruins of "), "{}", name);
            assert!(name.len() > "Ruins of ".len());
        }
    }

    #[test]
    fn test_spaced_prefixes_keep_a_space() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..500 {
            let name = place_name(TerrainType::Forest, &mut rng);
            if let Some(rest) = name.strip_prefix("Dead Man's") {
                assert!(rest.starts_with(' '));
                assert!(rest[1..].chars().next().map_or(false, |c| c.is_uppercase()));
            }
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("hollow"), "Hollow");
        assert_eq!(capitalize(""), "");
    }
}
