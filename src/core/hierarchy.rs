//! Type hierarchy queries.
//!
//! [`TypeHierarchy`] is the capability the compatibility pass uses to inspect
//! a class's position in the hierarchy. [`TypeSystem`] answers it from a
//! [`Scope`]-derived graph with one node per type and an edge per
//! `extends`/`implements` relation.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::core::scope::ClassSource;
use crate::core::types::DexType;

/// Hierarchy oracle.
pub trait TypeHierarchy {
    /// Immediate superclass of `ty`, if known.
    fn super_class(&self, ty: DexType) -> Option<DexType>;

    /// Every interface a class implements: those it and its superclasses
    /// declare, plus everything those interfaces extend.
    fn implemented_interfaces(&self, ty: DexType) -> BTreeSet<DexType>;

    /// Every interface an interface extends, transitively, excluding itself.
    fn super_interfaces(&self, ty: DexType) -> BTreeSet<DexType>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Extends,
    Implements,
}

/// Graph-backed [`TypeHierarchy`].
#[derive(Debug, Clone, Default)]
pub struct TypeSystem {
    graph: DiGraph<DexType, Relation>,
    nodes: HashMap<DexType, NodeIndex>,
}

impl TypeSystem {
    /// Build the hierarchy graph for every class in `classes`.
    pub fn new(classes: &dyn ClassSource) -> Self {
        let mut system = TypeSystem::default();

        for cls in classes.classes() {
            let node = system.node(cls.ty);
            if let Some(sup) = cls.super_class {
                let sup = system.node(sup);
                system.graph.add_edge(node, sup, Relation::Extends);
            }
            for &intf in &cls.interfaces {
                let intf = system.node(intf);
                system.graph.add_edge(node, intf, Relation::Implements);
            }
        }

        tracing::debug!(
            "type system: {} types, {} relations",
            system.graph.node_count(),
            system.graph.edge_count()
        );
        system
    }

    fn node(&mut self, ty: DexType) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(&ty) {
            return idx;
        }
        let idx = self.graph.add_node(ty);
        self.nodes.insert(ty, idx);
        idx
    }

    fn targets(&self, node: NodeIndex, relation: Relation) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges(node)
            .filter(move |e| *e.weight() == relation)
            .map(|e| e.target())
    }

    /// Collect everything reachable from `start` over `Implements` edges
    /// into `out`.
    fn collect_interfaces(
        &self,
        start: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        out: &mut BTreeSet<DexType>,
    ) {
        let mut stack: Vec<NodeIndex> = self.targets(start, Relation::Implements).collect();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            out.insert(self.graph[node]);
            stack.extend(self.targets(node, Relation::Implements));
        }
    }
}

impl TypeHierarchy for TypeSystem {
    fn super_class(&self, ty: DexType) -> Option<DexType> {
        let node = *self.nodes.get(&ty)?;
        self.targets(node, Relation::Extends)
            .next()
            .map(|n| self.graph[n])
    }

    fn implemented_interfaces(&self, ty: DexType) -> BTreeSet<DexType> {
        let mut out = BTreeSet::new();
        let Some(&start) = self.nodes.get(&ty) else {
            return out;
        };

        let mut visited = HashSet::new();
        let mut chain = HashSet::new();
        let mut current = Some(start);
        while let Some(node) = current {
            if !chain.insert(node) {
                break;
            }
            self.collect_interfaces(node, &mut visited, &mut out);
            current = self.targets(node, Relation::Extends).next();
        }
        out
    }

    fn super_interfaces(&self, ty: DexType) -> BTreeSet<DexType> {
        let mut out = BTreeSet::new();
        if let Some(&start) = self.nodes.get(&ty) {
            let mut visited = HashSet::from([start]);
            self.collect_interfaces(start, &mut visited, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ClassBuilder, ScopeBuilder};

    fn ty(s: &str) -> DexType {
        DexType::new(s).unwrap()
    }

    fn sample() -> TypeSystem {
        let scope = ScopeBuilder::new()
            .class(ClassBuilder::interface("Lapp/Base;"))
            .class(ClassBuilder::interface("Lapp/Mid;").implements("Lapp/Base;"))
            .class(ClassBuilder::interface("Lapp/Other;"))
            .class(ClassBuilder::class("Lapp/Parent;").implements("Lapp/Mid;"))
            .class(
                ClassBuilder::class("Lapp/Child;")
                    .extends("Lapp/Parent;")
                    .implements("Lapp/Other;"),
            )
            .build();
        TypeSystem::new(&scope)
    }

    #[test]
    fn test_super_class() {
        let ts = sample();
        assert_eq!(ts.super_class(ty("Lapp/Child;")), Some(ty("Lapp/Parent;")));
        assert_eq!(
            ts.super_class(ty("Lapp/Parent;")),
            Some(ty("Ljava/lang/Object;"))
        );
        assert_eq!(ts.super_class(ty("Lnowhere/X;")), None);
    }

    #[test]
    fn test_implemented_interfaces_include_inherited() {
        let ts = sample();
        let intfs = ts.implemented_interfaces(ty("Lapp/Child;"));
        let expected: BTreeSet<_> = ["Lapp/Other;", "Lapp/Mid;", "Lapp/Base;"]
            .into_iter()
            .map(ty)
            .collect();
        assert_eq!(intfs, expected);
    }

    #[test]
    fn test_super_interfaces_are_transitive() {
        let ts = sample();
        assert_eq!(
            ts.super_interfaces(ty("Lapp/Mid;")),
            BTreeSet::from([ty("Lapp/Base;")])
        );
        assert!(ts.super_interfaces(ty("Lapp/Base;")).is_empty());
    }

    #[test]
    fn test_cyclic_input_terminates() {
        let scope = ScopeBuilder::new()
            .class(ClassBuilder::interface("Lapp/A;").implements("Lapp/B;"))
            .class(ClassBuilder::interface("Lapp/B;").implements("Lapp/A;"))
            .build();
        let ts = TypeSystem::new(&scope);

        assert_eq!(ts.super_interfaces(ty("Lapp/A;")), BTreeSet::from([ty("Lapp/B;")]));
    }
}
