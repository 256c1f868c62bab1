//! Random, schema-checked growth of query builders.

use std::collections::BTreeSet;

use rand::{
    Rng, SeedableRng,
    rngs::SmallRng,
    seq::{IteratorRandom, SliceRandom},
};
use tracing::{debug, instrument, trace, warn};

use crate::{
    error::QueryGenError,
    ids::TypeLabel,
    pick::{Instances, Picker},
    schema::{SchemaIntrospector, TypeKind},
    store::ConceptStore,
};

use super::{
    Variable,
    builder::{Extension, QueryBuilder, Slot},
    config::GeneratorConfig,
    pattern::QueryPattern,
};

/// Synthesises random read queries that respect a schema.
///
/// Each query is grown by its own [`QueryBuilder`]: the first variable takes
/// an entity type (any type if the schema declares no entities), then random
/// relation or attribute extensions are planned against the schema and
/// applied until the target variable count is reached. A step that finds no
/// legal extension within the attempt budget abandons the query, and the
/// query is restarted up to the configured number of times.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use kgbench_core::{
///     Concept, ConceptStore, GeneratorBuilder, QueryGenerator, RoleLabel, SchemaIntrospector,
///     StoreError, StoreResult, TypeKind, TypeLabel,
/// };
///
/// /// A `member` entity owning a `nickname` attribute, with no instances.
/// struct Club;
///
/// impl SchemaIntrospector for Club {
///     fn thing_types(&self) -> StoreResult<BTreeSet<TypeLabel>> {
///         Ok(BTreeSet::from(["member".into(), "nickname".into()]))
///     }
///     fn kind_of(&self, label: &TypeLabel) -> StoreResult<TypeKind> {
///         match label.as_str() {
///             "member" => Ok(TypeKind::Entity),
///             "nickname" => Ok(TypeKind::Attribute),
///             _ => Err(StoreError::UnknownType { label: label.clone() }),
///         }
///     }
///     fn roles_of(&self, _: &TypeLabel) -> StoreResult<BTreeSet<RoleLabel>> {
///         Ok(BTreeSet::new())
///     }
///     fn roles_played_by(&self, _: &TypeLabel) -> StoreResult<BTreeSet<(TypeLabel, RoleLabel)>> {
///         Ok(BTreeSet::new())
///     }
///     fn legal_role_player_types(
///         &self,
///         _: &TypeLabel,
///         _: &RoleLabel,
///     ) -> StoreResult<BTreeSet<TypeLabel>> {
///         Ok(BTreeSet::new())
///     }
///     fn legal_attribute_types(&self, owner: &TypeLabel) -> StoreResult<BTreeSet<TypeLabel>> {
///         Ok(if owner.as_str() == "member" {
///             BTreeSet::from(["nickname".into()])
///         } else {
///             BTreeSet::new()
///         })
///     }
/// }
///
/// impl ConceptStore for Club {
///     fn instance_count(&self, _: &TypeLabel) -> StoreResult<usize> {
///         Ok(0)
///     }
///     fn instance_at(&self, _: &TypeLabel, _: usize) -> StoreResult<Option<Concept>> {
///         Ok(None)
///     }
/// }
///
/// let config = GeneratorBuilder::new()
///     .with_seed(3)
///     .with_vars(2, 2)
///     .with_attribute_probability(1.0)
///     .build()?;
/// let mut generator = QueryGenerator::new(&Club, config);
/// for pattern in generator.generate(3)? {
///     assert_eq!(
///         pattern.to_string(),
///         "match $x0 isa member; $x1 isa nickname; $x0 has nickname $x1; get;"
///     );
/// }
/// # Ok::<(), kgbench_core::QueryGenError>(())
/// ```
#[derive(Debug)]
pub struct QueryGenerator<'k, K> {
    knowledge: &'k K,
    config: GeneratorConfig,
    rng: SmallRng,
}

impl<'k, K: SchemaIntrospector + ConceptStore> QueryGenerator<'k, K> {
    /// Creates a generator seeded from `config`.
    #[must_use]
    pub fn new(knowledge: &'k K, config: GeneratorConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.seed());
        Self {
            knowledge,
            config,
            rng,
        }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Grows one query and returns its completed builder.
    ///
    /// # Errors
    /// Returns [`QueryGenError::EmptySchema`] when the schema has no types,
    /// [`QueryGenError::GenerationFailed`] when every attempt hit a
    /// [`QueryGenError::SchemaViolation`], and propagates store failures.
    #[instrument(name = "querygen.generate_new_query", err, skip(self))]
    pub fn generate_new_query(&mut self) -> Result<QueryBuilder, QueryGenError> {
        let synthesis = Synthesis {
            knowledge: self.knowledge,
            config: &self.config,
        };
        synthesis.build_with_retries(&mut self.rng)
    }

    /// Generates `count` independent query patterns.
    ///
    /// # Errors
    /// Fails on the first query that cannot be generated; no partial batch is
    /// returned.
    #[instrument(name = "querygen.generate", err, skip(self))]
    pub fn generate(&mut self, count: usize) -> Result<Vec<QueryPattern>, QueryGenError> {
        let patterns = (0..count)
            .map(|_| self.generate_new_query()?.finish())
            .collect::<Result<Vec<_>, _>>()?;
        debug!(generated = patterns.len(), "query batch generated");
        Ok(patterns)
    }

    #[cfg(feature = "parallel")]
    fn synthesis(&self) -> Synthesis<'_, K> {
        Synthesis {
            knowledge: self.knowledge,
            config: &self.config,
        }
    }
}

#[cfg(feature = "parallel")]
impl<K: SchemaIntrospector + ConceptStore + Sync> QueryGenerator<'_, K> {
    /// Generates `count` query patterns on the rayon pool.
    ///
    /// Query `i` uses its own random source derived from the configured seed
    /// and `i`, so the batch is reproducible regardless of thread count. The
    /// generator's sequential random source is not advanced.
    ///
    /// # Errors
    /// As [`QueryGenerator::generate`].
    #[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
    #[instrument(name = "querygen.generate_parallel", err, skip(self))]
    pub fn generate_parallel(&self, count: usize) -> Result<Vec<QueryPattern>, QueryGenError> {
        use rayon::prelude::*;

        let synthesis = self.synthesis();
        let seed = self.config.seed();
        (0..count)
            .into_par_iter()
            .map(|index| {
                let mut rng = SmallRng::seed_from_u64(mix_query_seed(seed, index));
                synthesis.build_with_retries(&mut rng)?.finish()
            })
            .collect()
    }
}

/// SplitMix64 increment used to spread per-query seeds.
#[cfg(feature = "parallel")]
const QUERY_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;

#[cfg(feature = "parallel")]
fn mix_query_seed(base_seed: u64, index: usize) -> u64 {
    let mut state = base_seed ^ ((index as u64).wrapping_add(1).wrapping_mul(QUERY_SEED_SPACING));
    state = state.wrapping_add(QUERY_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    state = (state ^ (state >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    state ^ (state >> 31)
}

enum Proposal {
    Ready(Extension),
    Rejected(String),
}

struct Synthesis<'a, K> {
    knowledge: &'a K,
    config: &'a GeneratorConfig,
}

impl<K: SchemaIntrospector + ConceptStore> Synthesis<'_, K> {
    fn build_with_retries<R: Rng>(&self, rng: &mut R) -> Result<QueryBuilder, QueryGenError> {
        let attempts = self.config.max_query_attempts().get();
        let mut attempt = 1;
        loop {
            match self.build_once(rng) {
                Ok(builder) => {
                    record_generated();
                    debug!(attempt, variables = builder.next_var(), "query synthesised");
                    return Ok(builder);
                }
                Err(error @ QueryGenError::SchemaViolation { .. }) if attempt < attempts => {
                    record_abandoned();
                    warn!(attempt, %error, "query attempt abandoned");
                    attempt += 1;
                }
                Err(error @ QueryGenError::SchemaViolation { .. }) => {
                    record_abandoned();
                    return Err(QueryGenError::GenerationFailed {
                        attempts,
                        last: Box::new(error),
                    });
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn build_once<R: Rng>(&self, rng: &mut R) -> Result<QueryBuilder, QueryGenError> {
        let types = self.knowledge.thing_types()?;
        let entities = self.knowledge.types_of_kind(TypeKind::Entity)?;
        let pool = if entities.is_empty() { &types } else { &entities };
        let initial = pool
            .iter()
            .choose(rng)
            .cloned()
            .ok_or(QueryGenError::EmptySchema)?;

        let target = rng.gen_range(self.config.min_vars().get()..=self.config.max_vars().get());
        let mut builder = QueryBuilder::new();
        let first = builder.add_variable(initial);
        self.maybe_pin(rng, &mut builder, &[first])?;
        while builder.next_var() < target {
            let extension = self.plan_extension(rng, &builder)?;
            let allocated = builder.apply(extension)?;
            self.maybe_pin(rng, &mut builder, &allocated)?;
        }
        builder.verify_attribute_ownership(self.knowledge)?;
        Ok(builder)
    }

    fn plan_extension<R: Rng>(
        &self,
        rng: &mut R,
        builder: &QueryBuilder,
    ) -> Result<Extension, QueryGenError> {
        let attempts = self.config.max_extension_attempts().get();
        let mut reason = String::new();
        for _ in 0..attempts {
            match self.propose(rng, builder)? {
                Proposal::Ready(extension) => return Ok(extension),
                Proposal::Rejected(rejected) => {
                    trace!(reason = %rejected, "extension rejected");
                    reason = rejected;
                }
            }
        }
        Err(QueryGenError::schema_violation(attempts, reason))
    }

    fn propose<R: Rng>(&self, rng: &mut R, builder: &QueryBuilder) -> Result<Proposal, QueryGenError> {
        let Some((&anchor, anchor_type)) = builder.variable_type_map().iter().choose(rng) else {
            return Ok(Proposal::Rejected("query has no variables".to_owned()));
        };
        if rng.gen_bool(self.config.attribute_probability()) {
            self.propose_attribute(rng, anchor, anchor_type)
        } else {
            self.propose_relation(rng, builder, anchor, anchor_type)
        }
    }

    fn propose_attribute<R: Rng>(
        &self,
        rng: &mut R,
        owner: Variable,
        owner_type: &TypeLabel,
    ) -> Result<Proposal, QueryGenError> {
        let legal = self.knowledge.legal_attribute_types(owner_type)?;
        Ok(match legal.into_iter().choose(rng) {
            Some(attribute_type) => Proposal::Ready(Extension::Attribute {
                owner,
                attribute_type,
            }),
            None => Proposal::Rejected(format!("{owner_type} owns no attribute types")),
        })
    }

    fn propose_relation<R: Rng>(
        &self,
        rng: &mut R,
        builder: &QueryBuilder,
        anchor: Variable,
        anchor_type: &TypeLabel,
    ) -> Result<Proposal, QueryGenError> {
        let played = self.knowledge.roles_played_by(anchor_type)?;
        let Some((relation, anchor_role)) = played.into_iter().choose(rng) else {
            return Ok(Proposal::Rejected(format!("{anchor_type} plays no roles")));
        };
        let mut players = vec![(anchor_role.clone(), Slot::Existing(anchor))];
        let mut bound = BTreeSet::from([anchor]);
        for role in self.knowledge.roles_of(&relation)? {
            if role == anchor_role || !rng.gen_bool(self.config.role_fill_probability()) {
                continue;
            }
            let legal = self.knowledge.legal_role_player_types(&relation, &role)?;
            let reused = if rng.gen_bool(self.config.reuse_probability()) {
                let compatible: Vec<Variable> = builder
                    .variable_type_map()
                    .iter()
                    .filter(|(variable, label)| !bound.contains(*variable) && legal.contains(*label))
                    .map(|(variable, _)| *variable)
                    .collect();
                compatible.choose(rng).copied()
            } else {
                None
            };
            let slot = match reused {
                Some(variable) => {
                    bound.insert(variable);
                    Slot::Existing(variable)
                }
                None => match legal.iter().choose(rng) {
                    Some(label) => Slot::Fresh(label.clone()),
                    None => {
                        return Ok(Proposal::Rejected(format!(
                            "no type may play {role} in {relation}"
                        )));
                    }
                },
            };
            players.push((role, slot));
        }
        Ok(Proposal::Ready(Extension::Relation {
            relation_type: relation,
            players,
        }))
    }

    fn maybe_pin<R: Rng>(
        &self,
        rng: &mut R,
        builder: &mut QueryBuilder,
        fresh: &[Variable],
    ) -> Result<(), QueryGenError> {
        let probability = self.config.pin_probability();
        if probability <= 0.0 {
            return Ok(());
        }
        for &variable in fresh {
            let Some(label) = builder.get_type(variable).cloned() else {
                return Err(QueryGenError::UnboundVariable { variable });
            };
            if self.knowledge.is_attribute_type(&label)? || !rng.gen_bool(probability) {
                continue;
            }
            let mut picker = Picker::new(&mut *rng, Instances::new(self.knowledge, label));
            if let Some(id) = picker.pick_one()? {
                trace!(%variable, %id, "variable pinned to instance");
                builder.pin(variable, id)?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
fn record_generated() {
    metrics::counter!("querygen_queries_generated").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_generated() {}

#[cfg(feature = "metrics")]
fn record_abandoned() {
    metrics::counter!("querygen_attempts_abandoned").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_abandoned() {}
