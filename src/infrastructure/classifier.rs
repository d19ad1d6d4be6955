// infrastructure/classifier.rs
//
// Artefact du classifieur pré-entraîné. Le fichier JSON contient le
// StandardScaler (moyennes et écarts-types par variable) et la forêt de
// décision exportée en tableaux aplatis (disposition sklearn) :
//
// {
//   "scaler": { "mean": [...], "scale": [...] },
//   "forest": [
//     { "feature": [6, -2, -2], "threshold": [549.5, 0.0, 0.0],
//       "left": [1, -1, -1], "right": [2, -1, -1], "value": [0.5, 0.1, 0.9] }
//   ]
// }
//
// Un noeud est une feuille quand left/right valent -1 ; "value" porte alors
// la fraction de la classe positive (approbation) sur la feuille.

use crate::models::prediction::FEATURE_COUNT;
use crate::models::Outcome;
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Paramètres du StandardScaler appliqué avant l'inférence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl ScalerParams {
    /// Standardise un vecteur de variables : (x - mean) / scale
    pub fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut scaled = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            scaled[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        scaled
    }
}

/// Arbre de décision en tableaux aplatis (disposition sklearn)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub feature: Vec<i32>,
    pub threshold: Vec<f64>,
    pub left: Vec<i32>,
    pub right: Vec<i32>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.feature.len()
    }

    /// Descend l'arbre depuis la racine et retourne la probabilité de la feuille
    fn predict_one(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut node = 0usize;
        loop {
            if self.left[node] < 0 {
                return self.value[node];
            }
            node = if x[self.feature[node] as usize] <= self.threshold[node] {
                self.left[node] as usize
            } else {
                self.right[node] as usize
            };
        }
    }

    /// Vérifie la cohérence structurelle de l'arbre.
    /// Invariant de terminaison : les indices d'enfants sont strictement
    /// croissants (disposition préfixe de sklearn), donc la descente
    /// atteint toujours une feuille.
    fn validate(&self, index: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(AppError::ModelArtifact(format!("tree {} is empty", index)));
        }
        if [
            self.threshold.len(),
            self.left.len(),
            self.right.len(),
            self.value.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err(AppError::ModelArtifact(format!(
                "tree {} has inconsistent array lengths",
                index
            )));
        }

        for node in 0..n {
            let is_leaf = self.left[node] < 0;
            if is_leaf {
                if self.right[node] >= 0 {
                    return Err(AppError::ModelArtifact(format!(
                        "tree {} node {} has a single child",
                        index, node
                    )));
                }
                continue;
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= FEATURE_COUNT {
                return Err(AppError::ModelArtifact(format!(
                    "tree {} node {} references feature {}",
                    index, node, feature
                )));
            }

            for &child in [self.left[node], self.right[node]].iter() {
                if child as usize >= n || child as usize <= node {
                    return Err(AppError::ModelArtifact(format!(
                        "tree {} node {} has out-of-order child {}",
                        index, node, child
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Classifieur d'approbation de prêt chargé depuis l'artefact JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanClassifier {
    pub scaler: ScalerParams,
    pub forest: Vec<DecisionTree>,
}

impl LoanClassifier {
    /// Charge et valide l'artefact depuis le disque (une fois, au démarrage)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::ModelArtifact(format!(
                "cannot read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let classifier: LoanClassifier = serde_json::from_str(&raw)
            .map_err(|e| AppError::ModelArtifact(format!("invalid artifact: {}", e)))?;

        classifier.validate()?;
        Ok(classifier)
    }

    /// Vérifie la cohérence de l'artefact complet
    pub fn validate(&self) -> Result<()> {
        if self.scaler.mean.len() != FEATURE_COUNT || self.scaler.scale.len() != FEATURE_COUNT {
            return Err(AppError::ModelArtifact(format!(
                "scaler expects {} features, got mean={} scale={}",
                FEATURE_COUNT,
                self.scaler.mean.len(),
                self.scaler.scale.len()
            )));
        }

        if self.scaler.scale.iter().any(|&s| s == 0.0 || !s.is_finite()) {
            return Err(AppError::ModelArtifact(
                "scaler contains zero or non-finite scale values".to_string(),
            ));
        }

        if self.forest.is_empty() {
            return Err(AppError::ModelArtifact("forest is empty".to_string()));
        }

        for (index, tree) in self.forest.iter().enumerate() {
            tree.validate(index)?;
        }

        Ok(())
    }

    /// Probabilité d'approbation (classe positive), entre 0 et 1
    pub fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> f64 {
        let scaled = self.scaler.transform(features);

        let sum: f64 = self
            .forest
            .iter()
            .map(|tree| tree.predict_one(&scaled))
            .sum();

        sum / self.forest.len() as f64
    }

    /// Verdict binaire : approbation si la probabilité atteint 0.5
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Outcome {
        if self.predict_proba(features) >= 0.5 {
            Outcome::Approved
        } else {
            Outcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scaler identité (mean 0, scale 1 partout)
    fn identity_scaler() -> ScalerParams {
        ScalerParams {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }

    /// Arbre à un seul split sur le score CIBIL (variable 6) :
    /// score <= 649 -> 0.1, sinon -> 0.9
    fn cibil_tree() -> DecisionTree {
        DecisionTree {
            feature: vec![6, -2, -2],
            threshold: vec![649.0, 0.0, 0.0],
            left: vec![1, -1, -1],
            right: vec![2, -1, -1],
            value: vec![0.5, 0.1, 0.9],
        }
    }

    fn features_with_cibil(score: f64) -> [f64; FEATURE_COUNT] {
        let mut features = [0.0; FEATURE_COUNT];
        features[6] = score;
        features
    }

    #[test]
    fn test_single_tree_routing() {
        let classifier = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![cibil_tree()],
        };

        assert_eq!(classifier.predict_proba(&features_with_cibil(600.0)), 0.1);
        assert_eq!(classifier.predict_proba(&features_with_cibil(649.0)), 0.1);
        assert_eq!(classifier.predict_proba(&features_with_cibil(650.0)), 0.9);

        assert_eq!(classifier.predict(&features_with_cibil(600.0)), Outcome::Rejected);
        assert_eq!(classifier.predict(&features_with_cibil(800.0)), Outcome::Approved);
    }

    #[test]
    fn test_forest_averages_trees() {
        // Deuxième arbre constant : toujours 0.3
        let constant_tree = DecisionTree {
            feature: vec![-2],
            threshold: vec![0.0],
            left: vec![-1],
            right: vec![-1],
            value: vec![0.3],
        };

        let classifier = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![cibil_tree(), constant_tree],
        };

        let proba = classifier.predict_proba(&features_with_cibil(800.0));
        assert!((proba - 0.6).abs() < 1e-12); // (0.9 + 0.3) / 2
    }

    #[test]
    fn test_scaler_applied_before_routing() {
        // Centre le score CIBIL sur 650 : un score brut de 700 devient 0.5
        let mut scaler = identity_scaler();
        scaler.mean[6] = 650.0;
        scaler.scale[6] = 100.0;

        // Split sur la valeur standardisée 0
        let tree = DecisionTree {
            feature: vec![6, -2, -2],
            threshold: vec![0.0, 0.0, 0.0],
            left: vec![1, -1, -1],
            right: vec![2, -1, -1],
            value: vec![0.5, 0.2, 0.8],
        };

        let classifier = LoanClassifier {
            scaler,
            forest: vec![tree],
        };

        assert_eq!(classifier.predict_proba(&features_with_cibil(600.0)), 0.2);
        assert_eq!(classifier.predict_proba(&features_with_cibil(700.0)), 0.8);
    }

    #[test]
    fn test_validation_rejects_bad_artifacts() {
        // Forêt vide
        let empty = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![],
        };
        assert!(empty.validate().is_err());

        // Scaler de mauvaise dimension
        let bad_scaler = LoanClassifier {
            scaler: ScalerParams {
                mean: vec![0.0; 3],
                scale: vec![1.0; 3],
            },
            forest: vec![cibil_tree()],
        };
        assert!(bad_scaler.validate().is_err());

        // Écart-type nul
        let mut zero_scale = identity_scaler();
        zero_scale.scale[0] = 0.0;
        let bad = LoanClassifier {
            scaler: zero_scale,
            forest: vec![cibil_tree()],
        };
        assert!(bad.validate().is_err());

        // Variable hors limites
        let mut bad_feature = cibil_tree();
        bad_feature.feature[0] = 42;
        let bad = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![bad_feature],
        };
        assert!(bad.validate().is_err());

        // Enfant qui pointe en arrière (cycle potentiel)
        let mut backward = cibil_tree();
        backward.left[0] = 0;
        let bad = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![backward],
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_load_round_trip_via_json() {
        let classifier = LoanClassifier {
            scaler: identity_scaler(),
            forest: vec![cibil_tree()],
        };

        let json = serde_json::to_string(&classifier).unwrap();
        let parsed: LoanClassifier = serde_json::from_str(&json).unwrap();
        parsed.validate().unwrap();

        assert_eq!(
            parsed.predict_proba(&features_with_cibil(800.0)),
            classifier.predict_proba(&features_with_cibil(800.0))
        );
    }
}
