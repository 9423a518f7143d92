//! Random forest evaluation
//!
//! Evaluates a tree ensemble exported from the offline training run. Each
//! tree is a flat node list rooted at index 0; a split sends the sample left
//! when `x[feature] <= threshold`. The forest probability is the mean of the
//! per-tree leaf distributions.

use serde::{Deserialize, Serialize};

use crate::error::AssessmentError;
use crate::types::{ClassProbabilities, Prediction, RiskLabel, FEATURE_COUNT};

/// Number of classes the forest predicts over
const CLASS_COUNT: usize = 2;

/// A node of an exported decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class weights at the leaf, [low_risk, high_risk]
        value: Vec<f64>,
    },
}

/// A single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, tree_index: usize) -> Result<(), AssessmentError> {
        let invalid = |detail: String| {
            AssessmentError::ModelUnavailable(format!("tree {tree_index}: {detail}"))
        };

        if self.nodes.is_empty() {
            return Err(invalid("has no nodes".to_string()));
        }

        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(invalid(format!("node {i} splits on unknown feature {feature}")));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("node {i} has a non-finite threshold")));
                    }
                    // Children come after their parent, so every path terminates.
                    if *left <= i || *right <= i || *left >= self.nodes.len() || *right >= self.nodes.len() {
                        return Err(invalid(format!("node {i} has out-of-order children")));
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != CLASS_COUNT {
                        return Err(invalid(format!(
                            "leaf {i} has {} class weights, expected {CLASS_COUNT}",
                            value.len()
                        )));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(invalid(format!("leaf {i} has invalid class weights")));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(invalid(format!("leaf {i} has no class weight")));
                    }
                }
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `sample`
    fn leaf_distribution(
        &self,
        sample: &[f64; FEATURE_COUNT],
    ) -> Result<[f64; CLASS_COUNT], AssessmentError> {
        let mut index = 0;

        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = sample.get(*feature).copied().ok_or_else(|| {
                        AssessmentError::ModelUnavailable(format!("unknown feature {feature}"))
                    })?;
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => {
                    let total: f64 = value.iter().sum();
                    if value.len() != CLASS_COUNT || total <= 0.0 {
                        break;
                    }
                    return Ok([value[0] / total, value[1] / total]);
                }
                None => break,
            }
        }

        Err(AssessmentError::ModelUnavailable(
            "decision tree traversal did not reach a valid leaf".to_string(),
        ))
    }
}

/// Tree ensemble classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    /// Check every tree is well formed
    pub fn validate(&self) -> Result<(), AssessmentError> {
        if self.trees.is_empty() {
            return Err(AssessmentError::ModelUnavailable(
                "random forest has no trees".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i)?;
        }

        Ok(())
    }

    /// Mean class distribution across all trees
    pub fn predict_proba(
        &self,
        sample: &[f64; FEATURE_COUNT],
    ) -> Result<ClassProbabilities, AssessmentError> {
        if self.trees.is_empty() {
            return Err(AssessmentError::ModelUnavailable(
                "random forest has no trees".to_string(),
            ));
        }

        let mut sums = [0.0; CLASS_COUNT];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(sample)?;
            sums[0] += dist[0];
            sums[1] += dist[1];
        }

        let n = self.trees.len() as f64;
        Ok(ClassProbabilities {
            low_risk: sums[0] / n,
            high_risk: sums[1] / n,
        })
    }

    /// Most probable class; ties resolve to low risk
    pub fn predict(&self, sample: &[f64; FEATURE_COUNT]) -> Result<Prediction, AssessmentError> {
        let probabilities = self.predict_proba(sample)?;
        let label = if probabilities.high_risk > probabilities.low_risk {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        };

        Ok(Prediction {
            label,
            probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stump on `feature`: left leaf favours low risk, right leaf high risk
    fn stump(feature: usize, threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf {
                    value: left.to_vec(),
                },
                TreeNode::Leaf {
                    value: right.to_vec(),
                },
            ],
        }
    }

    fn sample_with(feature: usize, value: f64) -> [f64; FEATURE_COUNT] {
        let mut sample = [0.0; FEATURE_COUNT];
        sample[feature] = value;
        sample
    }

    #[test]
    fn test_single_tree_routing() {
        let forest = RandomForest {
            trees: vec![stump(3, 0.5, [9.0, 1.0], [2.0, 8.0])],
        };
        assert!(forest.validate().is_ok());

        let low = forest.predict(&sample_with(3, 0.5)).unwrap();
        assert_eq!(low.label, RiskLabel::LowRisk);
        assert!((low.probabilities.low_risk - 0.9).abs() < 1e-9);

        let high = forest.predict(&sample_with(3, 0.6)).unwrap();
        assert_eq!(high.label, RiskLabel::HighRisk);
        assert!((high.probabilities.high_risk - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = RandomForest {
            trees: vec![
                stump(0, 0.0, [1.0, 0.0], [0.0, 1.0]),
                stump(1, 0.0, [1.0, 0.0], [0.0, 1.0]),
                stump(2, 0.0, [1.0, 0.0], [0.0, 1.0]),
            ],
        };

        let mut sample = [0.0; FEATURE_COUNT];
        sample[0] = 1.0;
        sample[1] = 1.0;
        let prediction = forest.predict(&sample).unwrap();

        assert_eq!(prediction.label, RiskLabel::HighRisk);
        assert!((prediction.probabilities.high_risk - 2.0 / 3.0).abs() < 1e-9);
        assert!((prediction.probabilities.low_risk - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_tie_resolves_to_low_risk() {
        let forest = RandomForest {
            trees: vec![
                stump(0, 0.0, [1.0, 0.0], [1.0, 0.0]),
                stump(0, 0.0, [0.0, 1.0], [0.0, 1.0]),
            ],
        };

        let prediction = forest.predict(&[0.0; FEATURE_COUNT]).unwrap();
        assert_eq!(prediction.label, RiskLabel::LowRisk);
        assert!((prediction.probabilities.low_risk - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_trees() {
        let empty = RandomForest { trees: vec![] };
        assert!(empty.validate().is_err());

        let bad_feature = RandomForest {
            trees: vec![stump(FEATURE_COUNT, 0.0, [1.0, 0.0], [0.0, 1.0])],
        };
        assert!(bad_feature.validate().is_err());

        let cyclic = RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 0,
                        right: 1,
                    },
                    TreeNode::Leaf {
                        value: vec![1.0, 0.0],
                    },
                ],
            }],
        };
        assert!(cyclic.validate().is_err());

        let empty_leaf = RandomForest {
            trees: vec![stump(0, 0.0, [0.0, 0.0], [0.0, 1.0])],
        };
        assert!(empty_leaf.validate().is_err());
    }

    #[test]
    fn test_unvalidated_cycle_errors_instead_of_looping() {
        let cyclic = RandomForest {
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 0,
                }],
            }],
        };

        assert!(matches!(
            cyclic.predict(&[0.0; FEATURE_COUNT]),
            Err(AssessmentError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_node_json_shape() {
        let json = r#"[
            {"feature": 3, "threshold": 0.25, "left": 1, "right": 2},
            {"value": [10.0, 2.0]},
            {"value": [1.0, 7.0]}
        ]"#;
        let nodes: Vec<TreeNode> = serde_json::from_str(json).unwrap();

        assert!(matches!(nodes[0], TreeNode::Split { feature: 3, .. }));
        assert!(matches!(nodes[2], TreeNode::Leaf { .. }));
    }
}
