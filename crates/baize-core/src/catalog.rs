//! Fixed storefront content: pro shop stock, training drills and the
//! encyclopedia's canned guides.

use crate::{Category, Difficulty, Drill, Guide, Product, Sport};

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    price: f64,
    category: Category,
    sport: Sport,
    description: &str,
    image_url: &str,
    rating: f32,
) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category,
        sport,
        description: description.to_string(),
        image_url: image_url.to_string(),
        rating,
    }
}

pub fn products() -> Vec<Product> {
    vec![
        product(
            "1",
            "Ronnie O'Sullivan Signature Series Cue",
            450.00,
            Category::Cue,
            Sport::Snooker,
            "Hand-spliced ebony butt with ash shaft. Perfectly balanced for break-building.",
            "https://picsum.photos/400/400?random=1",
            4.9,
        ),
        product(
            "2",
            "Aramith Tournament Champion Ball Set",
            220.00,
            Category::Balls,
            Sport::Snooker,
            "The industry standard for professional play. High durability and perfect consistency.",
            "https://picsum.photos/400/400?random=2",
            5.0,
        ),
        product(
            "3",
            "Predator Revo 12.4mm Shaft",
            529.00,
            Category::Cue,
            Sport::Pool,
            "Carbon fiber composite shaft providing low deflection and high accuracy.",
            "https://picsum.photos/400/400?random=3",
            4.8,
        ),
        product(
            "4",
            "Brunswick Gold Crown VI Table",
            8500.00,
            Category::Table,
            Sport::Pool,
            "The legendary table found in pool halls worldwide. Mahogany finish with drop pockets.",
            "https://picsum.photos/600/400?random=4",
            5.0,
        ),
        product(
            "5",
            "Master Chalk (Box of 12)",
            12.99,
            Category::Accessory,
            Sport::Both,
            "The most popular chalk on the market. Green color to match standard cloth.",
            "https://picsum.photos/400/400?random=5",
            4.5,
        ),
        product(
            "6",
            "Riley Aristocrat Tournament Table",
            12000.00,
            Category::Table,
            Sport::Snooker,
            "As seen in the World Championships. Steel block cushions and premium slate.",
            "https://picsum.photos/600/400?random=6",
            5.0,
        ),
        product(
            "7",
            "Peradon Leather Cue Case",
            150.00,
            Category::Accessory,
            Sport::Both,
            "Genuine leather case for 3/4 jointed cues. Offers superior protection.",
            "https://picsum.photos/400/400?random=7",
            4.7,
        ),
        product(
            "8",
            "Extension Bridge Stick",
            45.00,
            Category::Accessory,
            Sport::Snooker,
            "Telescopic rest for those hard-to-reach shots across the table.",
            "https://picsum.photos/400/400?random=8",
            4.2,
        ),
    ]
}

pub fn find_product(id: &str) -> Option<Product> {
    products().into_iter().find(|p| p.id == id)
}

fn drill(
    id: &str,
    title: &str,
    difficulty: Difficulty,
    description: &str,
    goal: &str,
    sport: Sport,
) -> Drill {
    Drill {
        id: id.to_string(),
        title: title.to_string(),
        difficulty,
        description: description.to_string(),
        goal: goal.to_string(),
        sport,
    }
}

pub fn drills() -> Vec<Drill> {
    vec![
        drill(
            "line-up",
            "The Line Up",
            Difficulty::Intermediate,
            "Place all 15 reds in a line down the center of the table. Clear them up with colors.",
            "Clearance",
            Sport::Snooker,
        ),
        drill(
            "colors-spots",
            "Colors Off The Spot",
            Difficulty::Beginner,
            "Pot the colors in sequence (Yellow to Black) from their spots. Respot after each pot.",
            "27 Points",
            Sport::Snooker,
        ),
        drill(
            "l-drill",
            "The L Drill",
            Difficulty::Advanced,
            "Place balls in an L shape around the pocket. Pot them in specific order maintaining position.",
            "No misses",
            Sport::Pool,
        ),
        drill(
            "long-potting",
            "Long Blue to Baulk",
            Difficulty::Advanced,
            "Place blue on spot, cue ball in D. Pot blue, bring cue ball back to baulk.",
            "10 in a row",
            Sport::Snooker,
        ),
        drill(
            "safety-thin",
            "Thin Safety",
            Difficulty::Intermediate,
            "Place object ball near cushion. Clip it thin to bring cue ball back to safety.",
            "Consistent length",
            Sport::Both,
        ),
    ]
}

pub fn find_drill(id: &str) -> Option<Drill> {
    drills().into_iter().find(|d| d.id == id)
}

fn guide(title: &str, description: &str, prompt: &str) -> Guide {
    Guide {
        title: title.to_string(),
        description: description.to_string(),
        prompt: prompt.to_string(),
    }
}

/// Cue-ball technique guides.
pub fn shot_guides() -> Vec<Guide> {
    vec![
        guide(
            "Stun Shot",
            "Stopping the cue ball dead on impact",
            "Explain the technique for a Stun Shot. Where do I strike the cue ball, how hard, and what is the physics behind the stop?",
        ),
        guide(
            "Screw / Draw",
            "Spinning the white ball backwards",
            "How do I play a deep screw shot (draw shot)? Give me tips on cue action, bridging, and striking point for maximum reaction.",
        ),
        guide(
            "Top Spin / Follow",
            "Driving the cue ball forward",
            "When should I use Top Spin (Follow) and how does it affect the potting angle and cue ball path after contact?",
        ),
        guide(
            "Side Spin (English)",
            "Altering the angle off cushions",
            "Explain the physics of Side Spin (English). How does it throw the object ball (throw effect) and change the rebound angle?",
        ),
        guide(
            "The Swerve",
            "Curving around an obstacle",
            "How do I execute a Swerve shot to curve around an interfering ball? Explain cue elevation and speed.",
        ),
        guide(
            "Jump Shot",
            "Getting air (Pool specific)",
            "How do I play a legal Jump Shot in pool? Explain the elevation, stroke, and rules regarding scooping.",
        ),
    ]
}

/// Tactical situation guides.
pub fn situation_guides() -> Vec<Guide> {
    vec![
        guide(
            "The Break Off",
            "Starting the frame tactically",
            "What is the best strategy for the break-off shot in Snooker vs 9-Ball Pool? How do I ensure safety?",
        ),
        guide(
            "Escaping Snookers",
            "Kicking off one or two rails",
            "Teach me the systems for escaping snookers. How do I calculate angles for a one-cushion or two-cushion escape?",
        ),
        guide(
            "Break Building",
            "Planning 3 shots ahead",
            "What are the key principles of break building in Snooker? How do I maintain position on the black?",
        ),
        guide(
            "Safety Exchange",
            "Putting your opponent in trouble",
            "Explain the concept of a 'Safety Exchange'. What constitutes a 'containing safety' vs an 'attacking safety'?",
        ),
        guide(
            "The Plant / Combo",
            "Potting ball A via ball B",
            "How do I calculate a plant (combination shot)? What determines if the balls are 'on' and how does the line of aim work?",
        ),
    ]
}

/// Which guide table an entry came from; decides the conversation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideKind {
    Shot,
    Situation,
}

impl GuideKind {
    pub fn label(&self, guide: &Guide) -> String {
        match self {
            GuideKind::Shot => format!("Tell me about the {}", guide.title),
            GuideKind::Situation => format!("Guide me on: {}", guide.title),
        }
    }
}

/// Look a guide up by title across both guide tables, ignoring case.
pub fn find_guide(title: &str) -> Option<(GuideKind, Guide)> {
    let wanted = title.trim().to_lowercase();
    shot_guides()
        .into_iter()
        .map(|g| (GuideKind::Shot, g))
        .chain(situation_guides().into_iter().map(|g| (GuideKind::Situation, g)))
        .find(|(_, g)| g.title.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_sizes() {
        assert_eq!(products().len(), 8);
        assert_eq!(drills().len(), 5);
        assert_eq!(shot_guides().len(), 6);
        assert_eq!(situation_guides().len(), 5);
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<String> = products().into_iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 8);
        let ids: HashSet<String> = drills().into_iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_lookups() {
        assert_eq!(find_drill("line-up").unwrap().title, "The Line Up");
        assert!(find_product("99").is_none());
        let (kind, guide) = find_guide("stun shot").unwrap();
        assert_eq!(kind, GuideKind::Shot);
        assert_eq!(kind.label(&guide), "Tell me about the Stun Shot");

        let (kind, guide) = find_guide("Break Building").unwrap();
        assert_eq!(kind, GuideKind::Situation);
        assert_eq!(kind.label(&guide), "Guide me on: Break Building");
    }

    #[test]
    fn test_product_wire_format() {
        let json = serde_json::to_value(find_product("5").unwrap()).unwrap();
        assert_eq!(json["category"], "accessory");
        assert_eq!(json["sport"], "both");
        assert!(json.get("imageUrl").is_some());
    }
}
