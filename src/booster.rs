use crate::error::{LoadError, ScoreError};
use crate::features::FeatureVector;
use crate::scorer::Classifier;
use statrs::function::logistic::{logistic, logit};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    Logistic, // base_score is a probability
    LogitRaw, // base_score is already a margin
}

impl Objective {
    pub fn from_name(name: &str) -> Result<Self, LoadError> {
        match name {
            "binary:logistic" | "reg:logistic" => Ok(Objective::Logistic),
            "binary:logitraw" => Ok(Objective::LogitRaw),
            other => Err(LoadError::UnsupportedObjective(other.to_string())),
        }
    }

    fn base_margin(self, base_score: f64) -> Result<f64, LoadError> {
        match self {
            Objective::Logistic => {
                if base_score > 0.0 && base_score < 1.0 {
                    Ok(logit(base_score))
                } else {
                    Err(LoadError::InvalidBaseScore(base_score.to_string()))
                }
            }
            Objective::LogitRaw => Ok(base_score),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>, // root at index 0
    num_features: usize,
}

impl Tree {
    pub fn new(id: usize, nodes: Vec<Node>, num_features: usize) -> Result<Self, LoadError> {
        let malformed = |reason: String| LoadError::MalformedTree { tree: id, reason };

        if nodes.is_empty() {
            return Err(malformed("no nodes".into()));
        }

        for (i, node) in nodes.iter().enumerate() {
            if let Node::Split { feature, left, right, .. } = *node {
                if left >= nodes.len() || right >= nodes.len() {
                    return Err(malformed(format!("node {i} points outside the tree")));
                }
                if feature >= num_features {
                    return Err(malformed(format!(
                        "node {i} splits on feature {feature} of {num_features}"
                    )));
                }
            }
        }

        // A well-formed tree reaches every node at most once from the root.
        let mut stack = vec![0usize];
        let mut visits = 0usize;
        while let Some(i) = stack.pop() {
            visits += 1;
            if visits > nodes.len() {
                return Err(malformed("node links form a cycle".into()));
            }
            if let Node::Split { left, right, .. } = nodes[i] {
                stack.push(left);
                stack.push(right);
            }
        }

        Ok(Tree { nodes, num_features })
    }

    // Thresholds and row values are f32, as XGBoost stores them.
    fn leaf_value(&self, row: &[f32]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split { feature, threshold, left, right, default_left } => {
                    let x = row[feature];
                    idx = if x.is_nan() {
                        if default_left { left } else { right }
                    } else if x < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }
}

#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
    objective: Objective,
    base_margin: f64,
    columns: Vec<usize>, // model feature index -> FeatureVector column
}

impl TreeEnsemble {
    pub fn new(
        trees: Vec<Tree>,
        objective: Objective,
        base_score: f64,
        columns: Vec<usize>,
    ) -> Result<Self, LoadError> {
        if trees.is_empty() {
            return Err(LoadError::EmptyModel);
        }
        if let Some((id, tree)) = trees
            .iter()
            .enumerate()
            .find(|(_, t)| t.num_features != columns.len())
        {
            return Err(LoadError::MalformedTree {
                tree: id,
                reason: format!(
                    "built for {} features, model binds {}",
                    tree.num_features,
                    columns.len()
                ),
            });
        }
        let base_margin = objective.base_margin(base_score)?;
        Ok(TreeEnsemble { trees, objective, base_margin, columns })
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn margin(&self, features: &FeatureVector) -> Result<f64, ScoreError> {
        if let Some((name, value)) = features.first_non_finite() {
            return Err(ScoreError::NonFiniteFeature { name, value });
        }

        let row = self
            .columns
            .iter()
            .map(|&col| {
                features
                    .value_at(col)
                    .map(|v| v as f32)
                    .ok_or_else(|| {
                        ScoreError::Backend(format!("column {col} missing from row"))
                    })
            })
            .collect::<Result<Vec<f32>, _>>()?;

        let leaves: f64 = self.trees.iter().map(|t| t.leaf_value(&row)).sum();
        let margin = self.base_margin + leaves;
        trace!(margin, trees = self.trees.len(), "ensemble margin");
        Ok(margin)
    }
}

impl Classifier for TreeEnsemble {
    fn predict_positive_class_probability(
        &self,
        features: &FeatureVector,
    ) -> Result<f64, ScoreError> {
        let p = logistic(self.margin(features)?);
        if !(0.0..=1.0).contains(&p) {
            return Err(ScoreError::InvalidProbability(p));
        }
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{derive_features, COLUMNS};
    use crate::model::PredictionRequest;

    fn identity_columns() -> Vec<usize> {
        (0..COLUMNS.len()).collect()
    }

    fn ensemble(
        trees: Vec<Tree>,
        objective: Objective,
        base_score: f64,
    ) -> Result<TreeEnsemble, LoadError> {
        TreeEnsemble::new(trees, objective, base_score, identity_columns())
    }

    fn stump(feature: usize, threshold: f32, left: f64, right: f64) -> Tree {
        Tree::new(
            0,
            vec![
                Node::Split { feature, threshold, left: 1, right: 2, default_left: true },
                Node::Leaf(left),
                Node::Leaf(right),
            ],
            COLUMNS.len(),
        )
        .unwrap()
    }

    #[test]
    fn stump_routes_on_strict_less_than() {
        let tree = stump(0, 30.0, -1.0, 1.0);
        assert_eq!(tree.leaf_value(&[29.0]), -1.0);
        assert_eq!(tree.leaf_value(&[30.0]), 1.0);
        assert_eq!(tree.leaf_value(&[f32::NAN]), -1.0);
    }

    #[test]
    fn rejects_out_of_range_children() {
        let nodes = vec![
            Node::Split { feature: 0, threshold: 1.0, left: 1, right: 5, default_left: false },
            Node::Leaf(0.0),
        ];
        assert!(matches!(
            Tree::new(3, nodes, 21),
            Err(LoadError::MalformedTree { tree: 3, .. })
        ));
    }

    #[test]
    fn rejects_cycles() {
        let nodes = vec![
            Node::Split { feature: 0, threshold: 1.0, left: 1, right: 2, default_left: false },
            Node::Split { feature: 0, threshold: 1.0, left: 0, right: 2, default_left: false },
            Node::Leaf(0.0),
        ];
        assert!(matches!(Tree::new(0, nodes, 21), Err(LoadError::MalformedTree { .. })));
    }

    #[test]
    fn rejects_unknown_split_feature() {
        let nodes = vec![
            Node::Split { feature: 21, threshold: 1.0, left: 1, right: 2, default_left: false },
            Node::Leaf(0.0),
            Node::Leaf(0.0),
        ];
        assert!(Tree::new(0, nodes, 21).is_err());
    }

    #[test]
    fn base_score_half_gives_zero_margin() {
        let ens = ensemble(vec![stump(0, 100.0, 0.0, 0.0)], Objective::Logistic, 0.5).unwrap();
        let fv = derive_features(&PredictionRequest::default());
        assert!(ens.margin(&fv).unwrap().abs() < 1e-12);
        let p = ens.predict_positive_class_probability(&fv).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn leaves_are_summed_then_squashed() {
        let trees = vec![stump(0, 100.0, 0.75, -3.0), stump(2, 500.0, 0.25, 2.0)];
        let ens = ensemble(trees, Objective::Logistic, 0.5).unwrap();
        // Default request: age 18 (< 100), credit 300 (< 500).
        let fv = derive_features(&PredictionRequest::default());
        let p = ens.predict_positive_class_probability(&fv).unwrap();
        assert!((p - 1.0 / (1.0 + (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn logistic_base_score_must_be_a_probability() {
        let err = ensemble(vec![stump(0, 1.0, 0.0, 0.0)], Objective::Logistic, 1.0);
        assert!(matches!(err, Err(LoadError::InvalidBaseScore(_))));
        let ok = ensemble(vec![stump(0, 1.0, 0.0, 0.0)], Objective::LogitRaw, 1.0);
        assert!(ok.is_ok());
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        assert!(matches!(
            ensemble(vec![], Objective::Logistic, 0.5),
            Err(LoadError::EmptyModel)
        ));
    }

    #[test]
    fn non_finite_feature_is_a_score_error() {
        let ens = ensemble(vec![stump(0, 1.0, 0.0, 0.0)], Objective::Logistic, 0.5).unwrap();
        let req = PredictionRequest { credit_score: 0, ..PredictionRequest::default() };
        let fv = derive_features(&req);
        assert!(matches!(
            ens.predict_positive_class_probability(&fv),
            Err(ScoreError::NonFiniteFeature { name: "Income_to_Credit", .. })
        ));
    }

    #[test]
    fn tree_wider_than_bound_columns_is_rejected() {
        let wide = Tree::new(
            0,
            vec![
                Node::Split { feature: 5, threshold: 1.0, left: 1, right: 2, default_left: false },
                Node::Leaf(-1.0),
                Node::Leaf(1.0),
            ],
            21,
        )
        .unwrap();
        let trees = vec![stump(0, 1.0, 0.0, 0.0), wide];
        let built = TreeEnsemble::new(trees, Objective::Logistic, 0.5, vec![0, 2]);
        assert!(matches!(built, Err(LoadError::MalformedTree { tree: 0, .. })));

        let narrow = Tree::new(
            1,
            vec![
                Node::Split {
                    feature: 1,
                    threshold: 500.0,
                    left: 1,
                    right: 2,
                    default_left: false,
                },
                Node::Leaf(-1.0),
                Node::Leaf(1.0),
            ],
            2,
        )
        .unwrap();
        let ens = TreeEnsemble::new(vec![narrow], Objective::Logistic, 0.5, vec![0, 2]).unwrap();
        // Model feature 1 is bound to Credit_Score (300 < 500).
        let margin = ens.margin(&derive_features(&PredictionRequest::default())).unwrap();
        assert!((margin + 1.0).abs() < 1e-12);
    }

    #[test]
    fn objective_names() {
        assert_eq!(Objective::from_name("binary:logistic").unwrap(), Objective::Logistic);
        assert_eq!(Objective::from_name("reg:logistic").unwrap(), Objective::Logistic);
        assert_eq!(Objective::from_name("binary:logitraw").unwrap(), Objective::LogitRaw);
        assert!(Objective::from_name("multi:softprob").is_err());
    }
}
