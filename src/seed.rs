use crate::error::AppResult;
use crate::service::CharacterService;
use crate::types::{CharacterPayload, CharacterStatus};

struct Sample {
    name: &'static str,
    real_name: &'static str,
    origin: &'static str,
    universe: &'static str,
    first_appearance: &'static str,
    powers: &'static str,
    description: &'static str,
    color: &'static str,
}

const AFFILIATION: &str = "Justice League";

const SAMPLES: [Sample; 10] = [
    Sample {
        name: "Superman",
        real_name: "Clark Kent",
        origin: "Krypton",
        universe: "Earth-1",
        first_appearance: "1938",
        powers: "Super strength, flight, x-ray vision, heat vision, super speed, invulnerability",
        description: "The Last Son of Krypton, defender of Earth and a symbol of hope for all of humanity.",
        color: "0066cc",
    },
    Sample {
        name: "Batman",
        real_name: "Bruce Wayne",
        origin: "Gotham City",
        universe: "Earth-1",
        first_appearance: "1939",
        powers: "Genius intellect, martial arts, advanced technology, master detective",
        description: "The Dark Knight of Gotham City, using his wealth and intellect to fight crime.",
        color: "333333",
    },
    Sample {
        name: "Wonder Woman",
        real_name: "Diana Prince",
        origin: "Themyscira",
        universe: "Earth-1",
        first_appearance: "1941",
        powers: "Super strength, flight, lasso of truth, indestructible bracelets, superhuman speed",
        description: "Amazon princess and ambassador of peace, a divine warrior with a hero's heart.",
        color: "cc0066",
    },
    Sample {
        name: "The Flash",
        real_name: "Barry Allen",
        origin: "Central City",
        universe: "Earth-1",
        first_appearance: "1956",
        powers: "Super speed, time travel, molecular vibration, Speed Force",
        description: "The fastest man alive, connected to the Speed Force and protector of Central City.",
        color: "ff0000",
    },
    Sample {
        name: "Green Lantern",
        real_name: "Hal Jordan",
        origin: "Coast City",
        universe: "Earth-1",
        first_appearance: "1959",
        powers: "Power ring, green energy constructs, flight, willpower",
        description: "Member of the Green Lantern Corps, protector of space sector 2814.",
        color: "00cc00",
    },
    Sample {
        name: "Aquaman",
        real_name: "Arthur Curry",
        origin: "Atlantis",
        universe: "Earth-1",
        first_appearance: "1941",
        powers: "Communication with marine life, super strength, underwater breathing, trident of Neptune",
        description: "King of Atlantis and protector of the oceans, bridge between land and sea.",
        color: "0099cc",
    },
    Sample {
        name: "Cyborg",
        real_name: "Victor Stone",
        origin: "Detroit",
        universe: "Earth-1",
        first_appearance: "1980",
        powers: "Alien technology, computer interface, sonic cannons, super strength",
        description: "Half man, half machine, linked to Mother Box technology and a vital League member.",
        color: "666666",
    },
    Sample {
        name: "Green Arrow",
        real_name: "Oliver Queen",
        origin: "Star City",
        universe: "Earth-1",
        first_appearance: "1941",
        powers: "Master archer, trick arrows, martial arts, acrobatics",
        description: "The Emerald Archer, defender of the oppressed and social crusader of Star City.",
        color: "009900",
    },
    Sample {
        name: "Martian Manhunter",
        real_name: "J'onn J'onzz",
        origin: "Mars",
        universe: "Earth-1",
        first_appearance: "1955",
        powers: "Telepathy, shapeshifting, invisibility, intangibility, super strength, flight",
        description: "Last of the Green Martians, detective and the emotional heart of the Justice League.",
        color: "990000",
    },
    Sample {
        name: "Shazam",
        real_name: "Billy Batson",
        origin: "Fawcett City",
        universe: "Earth-S",
        first_appearance: "1940",
        powers: "Strength of Hercules, speed of Mercury, stamina of Atlas, power of Zeus, courage of Achilles, wisdom of Solomon",
        description: "Young hero with the power of the ancient gods, transformed by shouting 'Shazam!'",
        color: "ffcc00",
    },
];

impl Sample {
    fn to_payload(&self) -> CharacterPayload {
        CharacterPayload {
            id: None,
            name: Some(self.name.to_string()),
            real_name: Some(self.real_name.to_string()),
            origin: Some(self.origin.to_string()),
            universe: Some(self.universe.to_string()),
            powers: Some(self.powers.to_string()),
            affiliation: Some(AFFILIATION.to_string()),
            first_appearance: Some(self.first_appearance.to_string()),
            status: Some(CharacterStatus::Active),
            description: Some(self.description.to_string()),
            image_url: Some(format!(
                "https://via.placeholder.com/300x400/{}/ffffff?text={}",
                self.color,
                self.name.replace(' ', "+")
            )),
        }
    }
}

/// Inserts the sample roster when the store holds no characters.
///
/// Returns the number of records inserted, zero if the store was not empty.
pub async fn seed_if_empty(service: &CharacterService) -> AppResult<usize> {
    if service.count().await? > 0 {
        tracing::debug!("Store already populated, skipping seed");
        return Ok(0);
    }
    for sample in &SAMPLES {
        service.create(sample.to_payload()).await?;
    }
    tracing::info!(total = service.count().await?, "Seeded sample characters");
    Ok(SAMPLES.len())
}
