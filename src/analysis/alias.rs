//! Alias Analyzer (`spec.md §4.D`).
//!
//! A flow-insensitive, whole-function approximation: tracks may-alias pairs
//! induced by reference-typed assignments/initializers and by ref/out/in
//! call arguments, then closes the relation over projections (an alias of a
//! prefix is an alias of every deeper place sharing that prefix).

use crate::analysis::place_extractor::PlaceExtractor;
use crate::model::{ArgumentBinding, Cfg, OperationShape, Place};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct AliasAnalysis {
    tracked: FxHashMap<Place, FxHashSet<Place>>,
}

impl AliasAnalysis {
    pub fn build(cfg: &Cfg, extractor: &dyn PlaceExtractor) -> Self {
        let mut tracked: FxHashMap<Place, FxHashSet<Place>> = FxHashMap::default();
        let mut link = |tracked: &mut FxHashMap<Place, FxHashSet<Place>>, a: Place, b: Place| {
            tracked.entry(a.clone()).or_default().insert(b.clone());
            tracked.entry(b).or_default().insert(a);
        };

        for block in &cfg.blocks {
            let mut visit_all = |op_id: crate::model::OperationId, tracked: &mut FxHashMap<Place, FxHashSet<Place>>| {
                walk(cfg, op_id, &mut |cfg, id| {
                    match &cfg.operation(id).shape {
                        OperationShape::SimpleAssign { target, value } => {
                            if cfg.operation(*value).is_reference_typed || is_by_ref_symbol(cfg, extractor, *value) {
                                if let (Some(t), Some(v)) = (extractor.try_create(cfg, *target), extractor.try_create(cfg, *value)) {
                                    link(tracked, t, v);
                                }
                            }
                        }
                        OperationShape::VariableDeclarator { declared, initializer: Some(init) } => {
                            if cfg.operation(*init).is_reference_typed || is_by_ref_symbol(cfg, extractor, *init) {
                                if let Some(v) = extractor.try_create(cfg, *init) {
                                    link(tracked, Place::new(declared.clone()), v);
                                }
                            }
                        }
                        OperationShape::Call { arguments, .. } => {
                            let places: Vec<Place> = arguments
                                .iter()
                                .filter(|a| a.binding != ArgumentBinding::ByValue)
                                .filter_map(|a| extractor.try_create(cfg, a.value))
                                .collect();
                            for i in 0..places.len() {
                                for j in (i + 1)..places.len() {
                                    link(tracked, places[i].clone(), places[j].clone());
                                }
                            }
                        }
                        _ => {}
                    }
                });
            };
            for op in &block.operations {
                visit_all(*op, &mut tracked);
            }
            if let Some(op) = block.branch_value {
                visit_all(op, &mut tracked);
            }
        }

        AliasAnalysis { tracked }
    }

    /// The three-step closure from `spec.md §4.D`: `p` itself, its tracked
    /// partners, and the tracked partners of every proper prefix of `p`,
    /// projected forward by the suffix beyond that prefix.
    pub fn aliases(&self, p: &Place) -> FxHashSet<Place> {
        let mut result = FxHashSet::default();
        result.insert(p.clone());
        if let Some(direct) = self.tracked.get(p) {
            result.extend(direct.iter().cloned());
        }
        for prefix_len in 0..p.depth() {
            let prefix = Place::with_projection(p.base().clone(), p.projection()[..prefix_len].to_vec());
            if let Some(partners) = self.tracked.get(&prefix) {
                let suffix = &p.projection()[prefix_len..];
                for partner in partners {
                    result.insert(partner.extend(suffix));
                }
            }
        }
        result
    }

    pub fn are_aliased(&self, l: &Place, r: &Place) -> bool {
        if l == r || l.shares_base_with(r) {
            return true;
        }
        self.aliases(l).contains(r)
    }
}

fn is_by_ref_symbol(cfg: &Cfg, extractor: &dyn PlaceExtractor, op: crate::model::OperationId) -> bool {
    extractor
        .try_create(cfg, op)
        .is_some_and(|p| p.depth() == 0 && p.base().is_by_ref())
}

fn walk(cfg: &Cfg, op: crate::model::OperationId, visit: &mut impl FnMut(&Cfg, crate::model::OperationId)) {
    visit(cfg, op);
    for child in children_of(&cfg.operation(op).shape) {
        walk(cfg, child, visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::place_extractor::StandardPlaceExtractor;
    use crate::testkit::*;

    #[test]
    fn every_place_aliases_itself_even_when_untracked() {
        let cfg = CfgBuilder::new().build();
        let analysis = AliasAnalysis::build(&cfg, &StandardPlaceExtractor);
        let p = Place::new(local("untouched"));
        let closure = analysis.aliases(&p);
        assert!(closure.contains(&p));
        assert_eq!(closure.len(), 1);
    }

    #[test]
    fn reference_assignment_is_alias_inducing() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let x = local("x");
        let y = local("y");
        let x_ref = b.make_op_typed(local_ref(&x), true);
        let target = b.make_op(local_ref(&y));
        b.push_op(blk, assign(target, x_ref));
        let cfg = b.build();

        let analysis = AliasAnalysis::build(&cfg, &StandardPlaceExtractor);
        assert!(analysis.are_aliased(&Place::new(x.clone()), &Place::new(y.clone())));
        assert!(analysis.aliases(&Place::new(y)).contains(&Place::new(x)));
    }

    #[test]
    fn value_typed_assignment_is_not_alias_inducing() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let x = local("x");
        let y = local("y");
        let x_ref = b.make_op(local_ref(&x));
        let target = b.make_op(local_ref(&y));
        // is_reference_typed left false: a value-typed copy, not an alias.
        b.push_op(blk, assign(target, x_ref));
        let cfg = b.build();

        let analysis = AliasAnalysis::build(&cfg, &StandardPlaceExtractor);
        assert!(!analysis.are_aliased(&Place::new(x), &Place::new(y)));
    }

    #[test]
    fn ref_arguments_in_same_call_are_mutually_aliased() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let a = local("a");
        let c = local("c");
        let a_ref = b.make_op(local_ref(&a));
        let c_ref = b.make_op(local_ref(&c));
        let call_op = b.make_op(call(None, vec![(a_ref, ArgumentBinding::Ref), (c_ref, ArgumentBinding::Out)]));
        b.push_op(blk, OperationShape::ExpressionStatement(call_op));
        let cfg = b.build();

        let analysis = AliasAnalysis::build(&cfg, &StandardPlaceExtractor);
        assert!(analysis.are_aliased(&Place::new(a), &Place::new(c)));
    }

    #[test]
    fn alias_of_prefix_projects_forward_onto_deeper_place() {
        let mut b = CfgBuilder::new();
        let blk = b.new_block();
        let x = local("x");
        let y = local("y");
        let x_ref = b.make_op_typed(local_ref(&x), true);
        let target = b.make_op(local_ref(&y));
        b.push_op(blk, assign(target, x_ref));
        let cfg = b.build();

        let analysis = AliasAnalysis::build(&cfg, &StandardPlaceExtractor);
        let y_dot_f = Place::new(y).project(field("f"));
        let x_dot_f = Place::new(x).project(field("f"));
        assert!(analysis.aliases(&y_dot_f).contains(&x_dot_f));
    }

    #[test]
    fn are_aliased_is_conservative_for_shared_base() {
        let base = local("arr");
        let l = Place::new(base.clone());
        let r = Place::new(base);
        assert!(AliasAnalysis::default().are_aliased(&l, &r));
    }
}

fn children_of(shape: &OperationShape) -> Vec<crate::model::OperationId> {
    match shape {
        OperationShape::FieldRef { base, .. } | OperationShape::PropertyRef { base, .. } | OperationShape::EventRef { base, .. } => base.into_iter().copied().collect(),
        OperationShape::ArrayElementRef { array, index } => vec![*array, *index],
        OperationShape::Conversion(inner) | OperationShape::Parenthesized(inner) | OperationShape::Await(inner) | OperationShape::ExpressionStatement(inner) => vec![*inner],
        OperationShape::ConditionalAccess { base, when_not_null } => vec![*base, *when_not_null],
        OperationShape::SimpleAssign { target, value } | OperationShape::CompoundAssign { target, value } => vec![*target, *value],
        OperationShape::Increment(op) | OperationShape::Decrement(op) => vec![*op],
        OperationShape::VariableDeclarator { initializer, .. } => initializer.into_iter().copied().collect(),
        OperationShape::Call { receiver, arguments } => receiver.into_iter().copied().chain(arguments.iter().map(|a| a.value)).collect(),
        OperationShape::BinaryOp { left, right } => vec![*left, *right],
        OperationShape::UnaryOp { operand } => vec![*operand],
        OperationShape::LocalRef(_) | OperationShape::ParamRef(_) | OperationShape::Literal | OperationShape::Other => vec![],
    }
}
