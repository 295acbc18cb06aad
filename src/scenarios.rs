use rand::Rng;

/// Number of names in each landmark pool.
pub const NAME_POOL_SIZE: usize = 8;

/// A themed map: title plus land and sea landmark names.
///
/// Text may contain `{KEY}` tokens that are replaced by a random synonym when
/// the scenario is chosen.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioTemplate {
    pub title: &'static str,
    pub land: [&'static str; NAME_POOL_SIZE],
    pub sea: [&'static str; NAME_POOL_SIZE],
}

/// A scenario with every synonym token resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub title: String,
    pub land_names: Vec<String>,
    pub sea_names: Vec<String>,
}

const fn scenario(
    title: &'static str,
    land: [&'static str; NAME_POOL_SIZE],
    sea: [&'static str; NAME_POOL_SIZE],
) -> ScenarioTemplate {
    ScenarioTemplate { title, land, sea }
}

/// Always available.
pub const COMMON_SCENARIOS: [ScenarioTemplate; 6] = [
    scenario(
        "{EVENT}",
        ["Emergency Bunker", "Safety Shelter", "Covert Surveillance Unit", "Military Installation", "Alien Spacecraft", "Smoking Crater", "Transmitter", "Science Facility"],
        ["Ruins", "Dry seabed", "Ruins", "Lack of water", "Ruins", "Dry seabed", "Ruins", "Lack of water"],
    ),
    scenario(
        "Doomed Mission to {PLANET}",
        ["Hive", "Egg Silo", "Secondary Hive", "Dead Colonists", "Communications Centre", "Launch Pad", "Shuttle", "Hadley's Hope"],
        ["Rock", "Rock", "Rock", "Rock", "Rock", "Rock", "Rock", "Rock"],
    ),
    scenario(
        "Lunar {Cartography}",
        ["Apollo 11", "Apollo 12", "Lunar Rover", "Insula Ventorum", "Mons Agnes", "Mons Hansteen", "Dorsum Azara", "Vallis Alpes"],
        ["Mare Imbrium", "Mare Serenitatis", "Mare Crisium", "Oceanus Procellarum", "Mare Nectaris", "Mare Australe", "Mare Vaporum", "Mare Parvum"],
    ),
    scenario(
        "Our {CAMPING} Camping Holiday",
        ["Unexploded Ordnance", "Remains of Tent", "Abandoned Uranium Mine", "Pack of Mad Yaks", "Poison Ivy", "{Mysterious} Monolith", "Lava Flow", "Museum of Spoons"],
        ["{Unusually}-Foamy Lake", "Too-hot Springs", "Piranhas", "Killer Pikes", "Sewage Outlet", "Broody Albatross", "Rocks", "Unusual Rocks"],
    ),
    scenario(
        "{OZYMANDIAS}",
        ["Lone, level sands", "Lone, level sands", "Lone, level sands", "Lone, level sands", "Lone, level sands", "Lone, level sands", "Lone, level sands", "Colossal Wreck"],
        ["Lone, level seabed", "Lone, level seabed", "Lone, level seabed", "Lone, level seabed", "Lone, level seabed", "Lone, level seabed", "Lone, level seabed", "Lone, level seabed"],
    ),
    scenario(
        "Ye Olde Mappe",
        ["Generic Medieval Inn", "Castle Black", "Wizard's Hollow", "The Wise Woman", "Weasel's End", "Forest of Night", "The Narrow Pass", "Wight Marsh"],
        ["Boggart Landing", "Submerged Wreck", "Lake of Unease", "Siren's Roost", "The Undertow", "Fallow Marshland", "The Domain of the Beast", "Shifting Shallows"],
    ),
];

/// Available when the island level is above [`ISLAND_THRESHOLD`].
pub const ISLAND_SCENARIOS: [ScenarioTemplate; 6] = [
    scenario(
        "Lost",
        ["The Black Rock", "Ash-circled Cabin", "Orchid Station", "The Swan", "Mysterious Hatch", "Flame Station", "Pearl Station", "Tempest Station"],
        ["Pala Ferry", "Wharf", "The Looking Glass", "Hydra Station", "Lighthouse", "Submerged rocks with hieroglyphs", "Remains of statue", "Wreck of Flight 815"],
    ),
    scenario(
        "{Mysterious Island}",
        ["???", "??", "?", "????", "???", "??", "?", "????"],
        ["???", "??", "?", "????", "???", "??", "?", "????"],
    ),
    scenario(
        "{Top} Secret Map",
        ["Secret Vault", "Institution 1", "Hidden Bunker", "Observation Tower", "Secret Laboratory", "Covert Surveillance Device", "Gulag", "Control Centre"],
        ["Underwater Lab", "Observation Vessel II", "Helicopter Landing Pad", "Sea Plane Dock", "Drill Site", "Sea Lab", "Stingray", "Submarine Station"],
    ),
    scenario(
        "MS. Found in a Bottle",
        ["Temple to the Unknown God", "Bottomless Pit of Despair", "Lightning-Struck Tree", "Unusual Arrangement of Sticks", "Vortex of Negativity", "Swamp of Despair", "Unmarked Grave", "{Mysterious} Statue"],
        ["Whirlpool", "Rune-scrawled Rock", "Abandoned Boat", "Message In an Unknown Language", "Dead Seagull", "Abyss", "Abandoned Boat", "Pentagram-shaped Starfish"],
    ),
    scenario(
        "Little Albion",
        [
            "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}",
            "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}", "{LATownStart}{LATownEnd}",
        ],
        ["Albion Sea", "Albion Channel", "Albion Ocean", "Albion Wash", "Greater Albion Sea", "Greater Albion Channel", "Greater Albion Ocean", "Greater Albion Wash"],
    ),
    scenario(
        "Treasure Island",
        ["The Admiral Benbow", "Bristol", "Abandoned Stockade", "Forest Retreat", "Buried Treasure", "X", "Bristol Channel", "The Hispaniola"],
        ["The Walrus", "Northern Bay", "Deep Ocean", "Shallow Waters", "Bar", "Shifting Sands", "Cove", "Schooner"],
    ),
];

/// Available when the island level is below [`MAINLAND_THRESHOLD`]. These are
/// light on sea landmarks, but such maps rarely show much sea.
pub const MAINLAND_SCENARIOS: [ScenarioTemplate; 7] = [
    scenario(
        "Sunnydale",
        ["Sunnydale High", "The Bronze", "Cemetary", "Sunnydale University", "Downtown Sunnydale", "1630 Revello Drive", "Sunnydale Zoo", "Crawford Street"],
        ["Seaport", "Harbour", "Dock", "Hydroelectric Dam", "Sunnydale Beach", "Kingman's Bluff", "Pacific Ocean", "Deep Water"],
    ),
    scenario(
        "Jungle of {JUNGLE}",
        ["Deadly Parrot Nest", "Lair of the Mad Tiger", "Grotesque Statue", "Menacing Pyramid", "Scorpion Nest", "Aggressive Ants", "Vicious Boars", "Razor-sharp Grass Blades"],
        ["Acidic Lagoon", "Alkaline Spring", "Infested Stream", "Lava Flow", "Acidic Lagoon", "Alkaline Spring", "Infested Stream", "Lava Flow"],
    ),
    scenario(
        "Quiet Knoll",
        ["Quiet Knoll Amusement Arcade", "Unusually-dirty Hospital", "Spooky School", "Bowling Alley", "Bar Infested with Strange Mannequins", "Triangle-headed Guy", "Red Square", "Something Disgusting to Fish Around In"],
        ["Quiet Knoll Lake", "Abandoned Boat", "Wonky Lighthouse", "Buoy", "Quiet Knoll Lake", "Rock", "Rock", "Buoy"],
    ),
    scenario(
        "The Lands of the Craft",
        ["Eldritch Stone", "Secret Monolith", "Crude Idol", "Hidden City", "Site of Degenerate Ritual", "Peculiar Tower", "Endless Plain of Madness", "Reflected City"],
        ["Caliginous Abyss", "City of the Deep Ones", "R'lyeh", "Statue to Dagon", "The Lost City", "The House of Cthulhu", "Stranded Submarine", "Grotesque Statue"],
    ),
    scenario(
        "The Silent {Lands}",
        ["Iceberg", "Ice Temple", "Mine Shaft", "Fuel Depot", "Snow Drift", "Main Camp", "Base Camp", "Fuel Depot"],
        ["Submersible", "Explorer II", "Dock", "Underwater Ice Cave", "Ice Floe", "Rock Formation", "Abandoned Ship", "Wreck"],
    ),
    scenario(
        "Vaguely Familiar Landscape",
        ["That place", "Near that thing", "You know... thingy", "Somewhere", "Whatever", "Um?", "Whatchamacallit", "Over there"],
        ["Somewhere wet", "Near that thing", "Watery bit", "Somewhere", "Whatever", "Some sea or other", "Whatchamacallit", "Over there"],
    ),
    scenario(
        "Silicon Valley",
        ["Z80 Processor", "Transistor", "Capacitor", "Relay", "Diode", "LED", "7-segment Display", "Main Bus"],
        ["Master Control Program", "Expansion Port", "Docking Station", "Power Ouput", "Main Input 1", "Secondary Power Source", "On-chip Battery", "Infinite Loop"],
    ),
];

/// Offered on half of all maps.
pub const RARE_SCENARIOS: [ScenarioTemplate; 5] = [
    scenario(
        "{FANTASY}",
        ["Elfindel", "Gorfall", "Fimbar", "Teracotia", "Faranesia", "Gondoria", "Mirrorfall", "Berathion"],
        ["Mirkwater", "Landmere", "The Misty Lake", "Bywater", "Bree Falls", "Erui", "Sirith", "Dank Water"],
    ),
    scenario(
        "Campbell Country",
        ["Mercy Hill", "Lower Brichester", "Upper Brichester", "Goatswood", "Temphill", "Severnford", "Clotton", "The Devil's Steps"],
        ["The Cam", "The Island", "Severn Estuary", "The Severn", "The Old Horns", "Pine Dunes", "Sunset Beach", "Gla'aki's Domain"],
    ),
    scenario(
        "Middle Earth",
        ["Weathertop", "Mount Doom", "Isengard", "Helm's Deep", "Mirkwood", "Erebor", "Mirrorfall", "Berathion"],
        ["Mirkwater", "Landmere", "The Misty Lake", "Bywater", "Bree Falls", "Erui", "Sirith", "Dank Water"],
    ),
    scenario(
        "The Legend",
        ["Camelot", "Wormelow Tump", "Richmond Castle", "Glastonbury Abbey", "Quimper", "Celliwig", "Pen Rhionydd", "Cadbury Castle"],
        ["Isle of Avalon", "Tintagel", "Merlin's Cave", "Camlet Moat", "Glein", "Dubglas", "Avon", "Aln"],
    ),
    scenario(
        "Deus Ex Cartographia",
        ["Battery Park", "Hell's Kitchen", "Area 51", "MJ12 Missile Silo", "Vandenberg Air Base", "Smuggler's Lair", "Warehouse District", "Gas Station"],
        ["Ocean Floor", "Ocean Floor", "Ocean Floor", "Pasadena Ocean Lab", "North Dock", "Canals", "MJ12 Submarine Base", "Liberty Island"],
    ),
];

/// Offered on a quarter of all maps.
pub const RAREST_SCENARIOS: [ScenarioTemplate; 1] = [scenario(
    "Filth",
    ["Fiddler's Nubbin", "Twiddling End", "Bell End", "Sticky Nook", "Furtling", "Spacious Passage", "Dogger's Gorge", "Natural Windbreak"],
    ["Damp Bottom", "Lower Swell", "Upper Mounds", "Sandy Ripples", "Muddy Parts", "Foamy Spume", "Salt Spray", "Groynes"],
)];

pub const ISLAND_THRESHOLD: f64 = 1.25;
pub const MAINLAND_THRESHOLD: f64 = 0.75;
const RARE_CHANCE: f64 = 0.5;
const RAREST_CHANCE: f64 = 0.25;

/// Messages shown while the map is being drawn.
pub const WAIT_MESSAGES: [&str; 18] = [
    "Adjusting bell curves",
    "Calibrating compasses",
    "Calibrating theodolites",
    "Clearing vegetation",
    "Coalescing cloud formations",
    "Sharpening coloured pencils",
    "Decrementing tectonic plates",
    "Exploring further",
    "Extracting resources",
    "Indexing indices",
    "Mapping contours",
    "Marking parchment",
    "Pouring lava",
    "Recording landmarks",
    "Reticulating splines",
    "Separating landmasses",
    "Stratifying ground layers",
    "Synthesising wavelets",
];

/// Alternatives for a `{KEY}` token. Unknown keys expand to themselves.
fn synonyms(key: &str) -> &'static [&'static str] {
    match key {
        "Unusually" => &["Unusually", "Strangely", "Remarkably"],
        "Mysterious" => &["Mysterious", "Eldritch", "Unusual", "Bizarre"],
        "Mysterious Island" => &[
            "Mysterious Island",
            "Island of Mystery",
            "Mysterious Island of Mystery",
            "Mysterious Island of Mysterious Mystery",
        ],
        "Lands" => &["Lands", "Realm", "World", "Expanse"],
        "Cartography" => &["Cartography", "Mission", "Exploration", "Landing"],
        "Top" => &["Top", "Extremely", "Rather", "Relatively", "Quite"],
        "LATownStart" => &[
            "Middling", "Potter", "Scar", "Putting", "Dripping", "Wimbling", "Melling", "Brid", "Horncaster", "Telling",
        ],
        "LATownEnd" => &["ford", "ton", "ham", "fordham", "ingborough", "ingtonham", "boro", "chester"],
        "CAMPING" => &["Worst Ever", "Best Ever", "Last", "First"],
        "PLANET" => &["LV-426", "Acheron"],
        "EVENT" => &["After the Event", "After the Incident", "The Remnants of Humanity", "Starting Again"],
        "JUNGLE" => &["Mystery", "Terror", "Death"],
        "OZYMANDIAS" => &["Look Upon My Works", "My Name is Ozymandias", "The Realm of Ozymandias", "My Works"],
        "FANTASY" => &[
            "Explorations in the Fantastic Realm",
            "Land of Mystery",
            "Fantasy Realm",
            "Land of Fantasy",
            "A Fantastic Journey",
        ],
        _ => &[],
    }
}

/// Replaces every `{KEY}` token in `template` with a random synonym.
pub fn expand<R: Rng>(template: &str, rng: &mut R) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                let choices = synonyms(key);
                if choices.is_empty() {
                    out.push_str(key);
                } else {
                    out.push_str(choices[rng.gen_range(0..choices.len())]);
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated token, keep the text as-is
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

impl ScenarioTemplate {
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Scenario {
        Scenario {
            title: expand(self.title, rng),
            land_names: self.land.iter().map(|name| expand(name, rng)).collect(),
            sea_names: self.sea.iter().map(|name| expand(name, rng)).collect(),
        }
    }
}

/// Scenarios on offer for a given island level. Draws the two rarity rolls.
pub fn available_scenarios<R: Rng>(island_level: f64, rng: &mut R) -> Vec<&'static ScenarioTemplate> {
    let mut available: Vec<&'static ScenarioTemplate> = COMMON_SCENARIOS.iter().collect();

    if island_level > ISLAND_THRESHOLD {
        available.extend(ISLAND_SCENARIOS.iter());
    } else if island_level < MAINLAND_THRESHOLD {
        available.extend(MAINLAND_SCENARIOS.iter());
    }

    if rng.gen::<f64>() < RARE_CHANCE {
        available.extend(RARE_SCENARIOS.iter());
    }
    if rng.gen::<f64>() < RAREST_CHANCE {
        available.extend(RAREST_SCENARIOS.iter());
    }

    available
}

/// Picks and resolves one scenario for the run.
pub fn choose_scenario<R: Rng>(island_level: f64, rng: &mut R) -> Scenario {
    let available = available_scenarios(island_level, rng);
    let template = available[rng.gen_range(0..available.len())];
    template.resolve(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_expand_plain_text_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(expand("Ye Olde Mappe", &mut rng), "Ye Olde Mappe");
    }

    #[test]
    fn test_expand_replaces_tokens() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let title = expand("Doomed Mission to {PLANET}", &mut rng);
        assert!(title == "Doomed Mission to LV-426" || title == "Doomed Mission to Acheron");

        let town = expand("{LATownStart}{LATownEnd}", &mut rng);
        assert!(!town.contains('{'));
        assert!(synonyms("LATownEnd").iter().any(|end| town.ends_with(end)));
    }

    #[test]
    fn test_expand_unknown_and_unterminated() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(expand("The {Nowhere} Sea", &mut rng), "The Nowhere Sea");
        assert_eq!(expand("Broken {token", &mut rng), "Broken {token");
    }

    #[test]
    fn test_island_level_selects_tables() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let islands = available_scenarios(1.8, &mut rng);
        assert!(islands.iter().any(|s| s.title == "Treasure Island"));
        assert!(!islands.iter().any(|s| s.title == "Sunnydale"));

        let mainland = available_scenarios(0.3, &mut rng);
        assert!(mainland.iter().any(|s| s.title == "Sunnydale"));
        assert!(!mainland.iter().any(|s| s.title == "Treasure Island"));

        let middling = available_scenarios(1.0, &mut rng);
        assert!(!middling.iter().any(|s| s.title == "Sunnydale" || s.title == "Lost"));
        assert!(middling.len() >= COMMON_SCENARIOS.len());
    }

    #[test]
    fn test_choose_scenario_resolves_pools() {
        for seed in 0..32 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let scenario = choose_scenario(1.5, &mut rng);
            assert_eq!(scenario.land_names.len(), NAME_POOL_SIZE);
            assert_eq!(scenario.sea_names.len(), NAME_POOL_SIZE);
            assert!(!scenario.title.contains('{'));
        }
    }

    #[test]
    fn test_choose_scenario_deterministic() {
        let a = choose_scenario(0.5, &mut ChaCha8Rng::seed_from_u64(99));
        let b = choose_scenario(0.5, &mut ChaCha8Rng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
