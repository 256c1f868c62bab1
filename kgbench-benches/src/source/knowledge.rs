//! Seeded knowledge graphs over a small workplace schema.

use kgbench_core::{ConceptId, RoleLabel, TypeLabel};
use kgbench_providers_memory::{KnowledgeGraph, Schema};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::SyntheticError;
use crate::error::BenchSetupError;

/// Schema used by [`SyntheticKnowledgeConfig::generate`].
pub const WORKPLACE_SCHEMA_YAML: &str = "\
entities:
  person:
    owns: [name]
    plays: [\"employment:employee\", \"friendship:friend\"]
  company:
    owns: [name]
    plays: [\"employment:employer\"]
relations:
  employment:
    relates: [employee, employer]
    owns: [since]
  friendship:
    relates: [friend]
attributes:
  name:
    value: string
  since:
    value: datetime
";

/// Configuration for a seeded workplace knowledge graph.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticKnowledgeConfig {
    /// Number of `person` instances.
    pub people: usize,
    /// Number of `company` instances.
    pub companies: usize,
    /// Number of `employment` relations between random people and companies.
    pub employments: usize,
    /// Number of `friendship` relations between two random people.
    pub friendships: usize,
    /// Seed for the generator.
    pub seed: u64,
}

impl SyntheticKnowledgeConfig {
    /// Builds the knowledge graph.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Synthetic`] when relations are requested
    /// without people or companies, and propagates insertion failures.
    pub fn generate(&self) -> Result<KnowledgeGraph, BenchSetupError> {
        let relations = self.employments + self.friendships;
        let lacks_players = self.people == 0 || (self.employments > 0 && self.companies == 0);
        if relations > 0 && lacks_players {
            return Err(SyntheticError::NoPlayers { relations }.into());
        }
        let schema = Schema::from_yaml_str(WORKPLACE_SCHEMA_YAML)?;
        let mut graph = KnowledgeGraph::new(format!("workplace-{}", self.seed), schema);
        let person = TypeLabel::from("person");
        let company = TypeLabel::from("company");
        for index in 0..self.people {
            graph.insert_thing(ConceptId::new(format!("p{index}")), person.clone(), None)?;
        }
        for index in 0..self.companies {
            graph.insert_thing(ConceptId::new(format!("c{index}")), company.clone(), None)?;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let employment = TypeLabel::from("employment");
        for index in 0..self.employments {
            let employee = ConceptId::new(format!("p{}", rng.gen_range(0..self.people)));
            let employer = ConceptId::new(format!("c{}", rng.gen_range(0..self.companies)));
            graph.insert_relation(
                ConceptId::new(format!("e{index}")),
                employment.clone(),
                vec![
                    (RoleLabel::from("employee"), employee),
                    (RoleLabel::from("employer"), employer),
                ],
            )?;
        }
        let friendship = TypeLabel::from("friendship");
        for index in 0..self.friendships {
            let players = (0..2)
                .map(|_| {
                    let friend = ConceptId::new(format!("p{}", rng.gen_range(0..self.people)));
                    (RoleLabel::from("friend"), friend)
                })
                .collect();
            graph.insert_relation(ConceptId::new(format!("f{index}")), friendship.clone(), players)?;
        }
        Ok(graph)
    }
}
