use crate::booster::{Node, Objective, Tree, TreeEnsemble};
use crate::error::LoadError;
use crate::features::{FeatureVector, COLUMNS};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

// Subset of XGBoost's JSON model schema (`Booster.save_model("*.json")`).

#[derive(Debug, Deserialize)]
struct ModelFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    feature_names: Vec<String>,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveParam,
    gradient_booster: GradientBooster,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    #[serde(default)]
    num_feature: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveParam {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    model: GbTreeModel,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    trees: Vec<RawTree>,
}

#[derive(Debug, Deserialize)]
struct RawTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Vec<Flag>,
}

// Older dumps write booleans, newer ones write 0/1.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

/// Reads the classifier artifact and binds its features to the form's columns.
pub fn load_classifier(path: &Path) -> Result<TreeEnsemble, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let file: ModelFile = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let ensemble = build_ensemble(file.learner)?;
    info!(
        path = %path.display(),
        trees = ensemble.num_trees(),
        objective = ?ensemble.objective(),
        "Loaded classifier"
    );
    Ok(ensemble)
}

fn build_ensemble(learner: Learner) -> Result<TreeEnsemble, LoadError> {
    let columns = bind_columns(&learner)?;
    let objective = Objective::from_name(&learner.objective.name)?;
    let base_score = parse_base_score(&learner.learner_model_param.base_score)?;

    let trees = learner
        .gradient_booster
        .model
        .trees
        .into_iter()
        .enumerate()
        .map(|(id, raw)| convert_tree(id, raw, columns.len()))
        .collect::<Result<Vec<_>, _>>()?;

    TreeEnsemble::new(trees, objective, base_score, columns)
}

// Model feature index -> FeatureVector column, matched by name.
fn bind_columns(learner: &Learner) -> Result<Vec<usize>, LoadError> {
    if learner.feature_names.is_empty() {
        let declared = learner
            .learner_model_param
            .num_feature
            .as_deref()
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        if declared != COLUMNS.len() {
            return Err(LoadError::FeatureCount { expected: COLUMNS.len(), actual: declared });
        }
        warn!("Model has no feature names, assuming training column order");
        return Ok((0..COLUMNS.len()).collect());
    }

    learner
        .feature_names
        .iter()
        .map(|name| {
            FeatureVector::index_of(name).ok_or_else(|| LoadError::SchemaMismatch(name.clone()))
        })
        .collect()
}

// "5E-1", or "[5E-1]" from XGBoost 2.1+
fn parse_base_score(raw: &str) -> Result<f64, LoadError> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = trimmed.split(',').next().unwrap_or_default().trim();
    first
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| LoadError::InvalidBaseScore(raw.to_string()))
}

fn convert_tree(id: usize, raw: RawTree, num_features: usize) -> Result<Tree, LoadError> {
    let n = raw.left_children.len();
    if raw.right_children.len() != n
        || raw.split_indices.len() != n
        || raw.split_conditions.len() != n
        || raw.default_left.len() != n
    {
        return Err(LoadError::MalformedTree {
            tree: id,
            reason: "node arrays differ in length".into(),
        });
    }

    let index = |value: i64, what: &str, node: usize| {
        usize::try_from(value).map_err(|_| LoadError::MalformedTree {
            tree: id,
            reason: format!("node {node} has negative {what} {value}"),
        })
    };

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        if raw.left_children[i] == -1 {
            nodes.push(Node::Leaf(raw.split_conditions[i]));
            continue;
        }
        nodes.push(Node::Split {
            feature: index(raw.split_indices[i], "split index", i)?,
            threshold: raw.split_conditions[i] as f32,
            left: index(raw.left_children[i], "left child", i)?,
            right: index(raw.right_children[i], "right child", i)?,
            default_left: raw.default_left[i].is_set(),
        });
    }

    Tree::new(id, nodes, num_features)
}
