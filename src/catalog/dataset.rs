//! Reference fish catalog
//!
//! Named Italian species first, then numbered placeholder species until each
//! habitat reaches its target. The order is stable across builds, so the
//! seeded collection's natural order is stable too.

use crate::db::{Habitat, SpeciesDoc};

/// Version key for the seed marker. Bump when the dataset changes shape.
pub const CATALOG_VERSION: &str = "fishdex-catalog-v1";

/// Smallest catalog the service is allowed to seed
pub const MIN_CATALOG_SIZE: usize = 150;

/// Species per habitat once placeholders are added
const HABITAT_TARGETS: [(Habitat, usize); 3] = [
    (Habitat::Marine, 50),
    (Habitat::River, 51),
    (Habitat::Lake, 50),
];

/// Side-view fish silhouette shared by every entry
pub const FISH_SILHOUETTE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjEwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cGF0aCBkPSJNMjAgNTBjMC0xMCAxMC0yMCAzMC0yMHM1MCAyMCA4MCAyMGMyMCAwIDQwLTEwIDYwLTEwczIwIDEwIDAiLz48L3N2Zz4=";

/// (name, scientific name, habitat, description)
const NAMED_SPECIES: &[(&str, &str, Habitat, &str)] = &[
    // Mare
    ("Spigola", "Dicentrarchus labrax", Habitat::Marine, "Predatore marino molto apprezzato, si trova vicino alle coste rocciose e sabbiose."),
    ("Orata", "Sparus aurata", Habitat::Marine, "Pesce pregiato con caratteristica macchia dorata tra gli occhi, vive in fondali sabbiosi."),
    ("Tonno rosso", "Thunnus thynnus", Habitat::Marine, "Grande pesce pelagico, il re del Mediterraneo. Può raggiungere dimensioni enormi."),
    ("Ricciola", "Seriola dumerili", Habitat::Marine, "Potente predatore pelagico, molto combattivo quando allamato."),
    ("Pesce serra", "Pomatomus saltatrix", Habitat::Marine, "Predatore vorace con denti affilati, caccia in branchi numerosi."),
    ("Dentice", "Dentex dentex", Habitat::Marine, "Pesce pregiato con potenti mascelle, vive su fondali rocciosi."),
    ("Sarago maggiore", "Diplodus sargus", Habitat::Marine, "Pesce comune nei porti e nelle scogliere, riconoscibile dalle bande verticali."),
    ("Rombo chiodato", "Scophthalmus maximus", Habitat::Marine, "Pesce piatto che vive nascosto sui fondali sabbiosi, eccellente mimesi."),
    ("Sogliola", "Solea solea", Habitat::Marine, "Pesce piatto bentonico, vive su fondali sabbiosi e fangosi."),
    ("Cefalo", "Mugil cephalus", Habitat::Marine, "Pesce eurialino che si adatta sia in mare che in acqua dolce."),
    ("Leccia amia", "Lichia amia", Habitat::Marine, "Predatore costiero di grande taglia, insegue i branchi di cefali sotto costa."),
    ("Palamita", "Sarda sarda", Habitat::Marine, "Piccolo tunnide striato, si pesca a traina in autunno."),
    ("Sgombro", "Scomber scombrus", Habitat::Marine, "Pesce azzurro dal dorso marezzato, forma banchi compatti."),
    ("Occhiata", "Oblada melanura", Habitat::Marine, "Sparide con una macchia nera sul peduncolo caudale, frequente sulle scogliere."),
    ("Mormora", "Lithognathus mormyrus", Habitat::Marine, "Sparide dei bassi fondali sabbiosi, si nutre scavando nella sabbia."),
    ("Scorfano rosso", "Scorpaena scrofa", Habitat::Marine, "Predatore d'agguato con spine velenose, vive tra le rocce."),
    ("Cernia bruna", "Epinephelus marginatus", Habitat::Marine, "Grande serranide territoriale delle tane rocciose, specie protetta in molte aree."),
    ("Pagro", "Pagrus pagrus", Habitat::Marine, "Sparide rosato dei fondali misti, molto ricercato."),
    ("Tanuta", "Spondyliosoma cantharus", Habitat::Marine, "Sparide grigio argenteo che nidifica su fondali sabbiosi."),
    ("Aguglia", "Belone belone", Habitat::Marine, "Pesce sottile dal lungo becco, nuota in superficie."),
    // Fiume
    ("Luccio", "Esox lucius", Habitat::River, "Predatore d'acqua dolce per eccellenza, con corpo affusolato e grandi mascelle."),
    ("Carpa", "Cyprinus carpio", Habitat::River, "Grande ciprinide, può raggiungere dimensioni notevoli. Molto resistente."),
    ("Trota fario", "Salmo trutta", Habitat::River, "Salmonide dei torrenti freddi e ossigenati, punteggiato di rosso."),
    ("Trota marmorata", "Salmo marmoratus", Habitat::River, "Trota endemica del bacino padano con livrea marmorizzata."),
    ("Temolo", "Thymallus thymallus", Habitat::River, "Salmonide dalla grande pinna dorsale, indicatore di acque pulite."),
    ("Cavedano", "Squalius cephalus", Habitat::River, "Ciprinide onnivoro molto diffuso in tutti i corsi d'acqua."),
    ("Barbo comune", "Barbus plebejus", Habitat::River, "Ciprinide di fondo con barbigli, ama le correnti vivaci."),
    ("Siluro", "Silurus glanis", Habitat::River, "Il più grande pesce d'acqua dolce europeo, attivo di notte."),
    ("Anguilla", "Anguilla anguilla", Habitat::River, "Pesce migratore che si riproduce nel Mar dei Sargassi."),
    ("Lasca", "Protochondrostoma genei", Habitat::River, "Piccolo ciprinide gregario dei fiumi del nord Italia."),
    ("Savetta", "Chondrostoma soetta", Habitat::River, "Ciprinide endemico padano, raschia le alghe dai sassi."),
    ("Storione cobice", "Acipenser naccarii", Habitat::River, "Storione endemico dell'Adriatico, risale i grandi fiumi."),
    ("Vairone", "Telestes muticellus", Habitat::River, "Piccolo ciprinide con una banda scura laterale, vive in acque limpide."),
    ("Aspio", "Leuciscus aspius", Habitat::River, "Ciprinide predatore che caccia in superficie."),
    ("Lucioperca", "Sander lucioperca", Habitat::River, "Percide predatore dai denti canini, preferisce acque torbide."),
    // Lago
    ("Persico reale", "Perca fluviatilis", Habitat::Lake, "Predatore con caratteristiche bande verticali scure, comune nei laghi."),
    ("Tinca", "Tinca tinca", Habitat::Lake, "Pesce bentonico con corpo tozzo, vive in acque stagnanti ricche di vegetazione."),
    ("Alborella", "Alburnus arborella", Habitat::Lake, "Piccolo pesce argentato che forma grandi branchi in superficie."),
    ("Coregone lavarello", "Coregonus lavaretus", Habitat::Lake, "Salmonide pelagico dei grandi laghi prealpini."),
    ("Salmerino alpino", "Salvelinus alpinus", Habitat::Lake, "Salmonide dei laghi freddi d'alta quota."),
    ("Agone", "Alosa agone", Habitat::Lake, "Clupeide lacustre, tradizionalmente essiccato sul lago di Como."),
    ("Persico trota", "Micropterus salmoides", Habitat::Lake, "Predatore introdotto dal Nord America, ama la vegetazione sommersa."),
    ("Persico sole", "Lepomis gibbosus", Habitat::Lake, "Piccolo centrarchide dai colori vivaci, molto territoriale."),
    ("Scardola", "Scardinius erythrophthalmus", Habitat::Lake, "Ciprinide dalle pinne rosse, frequenta i canneti."),
    ("Bottatrice", "Lota lota", Habitat::Lake, "Unico gadide d'acqua dolce, vive sul fondo dei laghi profondi."),
    ("Carassio", "Carassius carassius", Habitat::Lake, "Ciprinide robusto che tollera acque povere di ossigeno."),
    ("Triotto", "Rutilus aula", Habitat::Lake, "Piccolo ciprinide gregario dei laghi settentrionali."),
];

/// One species definition before it has an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub scientific_name: String,
    pub habitat: Habitat,
    pub description: String,
    pub reference_image: String,
}

impl CatalogEntry {
    /// Materialize as a stored species with the given id
    pub fn into_doc(self, id: String) -> SpeciesDoc {
        SpeciesDoc {
            id,
            name: self.name,
            scientific_name: self.scientific_name,
            habitat: self.habitat,
            description: self.description,
            reference_image: self.reference_image,
            is_unlocked: false,
            user_catch: None,
        }
    }
}

/// Build the full reference catalog in seed order
pub fn fish_catalog() -> Vec<CatalogEntry> {
    let mut catalog: Vec<CatalogEntry> = NAMED_SPECIES
        .iter()
        .map(|(name, scientific_name, habitat, description)| CatalogEntry {
            name: name.to_string(),
            scientific_name: scientific_name.to_string(),
            habitat: *habitat,
            description: description.to_string(),
            reference_image: FISH_SILHOUETTE.to_string(),
        })
        .collect();

    let mut remaining: Vec<(Habitat, usize)> = HABITAT_TARGETS
        .iter()
        .map(|(habitat, target)| {
            let named = catalog.iter().filter(|e| e.habitat == *habitat).count();
            (*habitat, target.saturating_sub(named))
        })
        .collect();

    // Round-robin over habitats that still need placeholders
    let mut number = catalog.len();
    while remaining.iter().any(|(_, left)| *left > 0) {
        for (habitat, left) in remaining.iter_mut() {
            if *left == 0 {
                continue;
            }
            number += 1;
            *left -= 1;
            catalog.push(placeholder(number, *habitat));
        }
    }

    catalog
}

fn placeholder(number: usize, habitat: Habitat) -> CatalogEntry {
    CatalogEntry {
        name: format!("Pesce {}", number),
        scientific_name: format!("Piscis species{}", number),
        habitat,
        description: format!(
            "Descrizione del pesce numero {} dell'habitat {}.",
            number, habitat
        ),
        reference_image: FISH_SILHOUETTE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_habitat_split() {
        let catalog = fish_catalog();
        assert_eq!(catalog.len(), 151);
        assert!(catalog.len() >= MIN_CATALOG_SIZE);

        let count = |h: Habitat| catalog.iter().filter(|e| e.habitat == h).count();
        assert_eq!(count(Habitat::Marine), 50);
        assert_eq!(count(Habitat::River), 51);
        assert_eq!(count(Habitat::Lake), 50);
    }

    #[test]
    fn test_named_species_come_first() {
        let catalog = fish_catalog();
        assert_eq!(catalog[0].name, "Spigola");
        assert_eq!(catalog[NAMED_SPECIES.len() - 1].name, "Triotto");
        assert_eq!(catalog[NAMED_SPECIES.len()].name, format!("Pesce {}", NAMED_SPECIES.len() + 1));
    }

    #[test]
    fn test_entries_are_complete_and_unique() {
        let catalog = fish_catalog();
        let mut names = HashSet::new();
        let mut scientific = HashSet::new();
        for entry in &catalog {
            assert!(!entry.name.is_empty());
            assert!(!entry.scientific_name.is_empty());
            assert!(!entry.reference_image.is_empty());
            assert!(names.insert(entry.name.clone()), "duplicate name {}", entry.name);
            assert!(
                scientific.insert(entry.scientific_name.clone()),
                "duplicate scientific name {}",
                entry.scientific_name
            );
        }
    }

    #[test]
    fn test_catalog_is_deterministic() {
        assert_eq!(fish_catalog(), fish_catalog());
    }

    #[test]
    fn test_into_doc_defaults_unlock_fields() {
        let entry = fish_catalog().remove(0);
        let doc = entry.clone().into_doc("id-1".into());
        assert_eq!(doc.id, "id-1");
        assert_eq!(doc.name, entry.name);
        assert!(!doc.is_unlocked);
        assert!(doc.user_catch.is_none());
    }
}
