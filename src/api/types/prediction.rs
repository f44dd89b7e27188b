//! Request and response bodies of the v1 API

use serde::{Deserialize, Serialize};

use crate::domain::{
    ColumnSpec, EncodingStrategy, ModelBundle, Prediction, ProjectionOptions, RawInput,
    TrainingMetadata,
};

/// Unit shown next to every prediction
pub const PREDICTION_UNIT: &str = "Parts/Hour";

/// POST /v1/predict body
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRequest {
    pub inputs: RawInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictResponse {
    pub prediction: f64,
    pub unit: &'static str,
    pub target: String,
    pub schema_fingerprint: String,
}

impl PredictResponse {
    pub fn from_prediction(prediction: &Prediction, bundle: &ModelBundle) -> Self {
        Self {
            prediction: prediction.value,
            unit: PREDICTION_UNIT,
            target: bundle.schema().target().to_string(),
            schema_fingerprint: bundle.schema().fingerprint(),
        }
    }
}

/// GET /v1/schema body
#[derive(Debug, Clone, Serialize)]
pub struct SchemaResponse {
    pub target: String,
    pub encoding: EncodingStrategy,
    pub columns: Vec<ColumnSpec>,
    pub feature_names: Vec<String>,
    pub fingerprint: String,
    /// Missing-value and unknown-category policies applied to inputs
    pub serving: ProjectionOptions,
}

impl SchemaResponse {
    pub fn from_bundle(bundle: &ModelBundle, serving: ProjectionOptions) -> Self {
        let schema = bundle.schema();

        Self {
            target: schema.target().to_string(),
            encoding: schema.encoding(),
            columns: schema.columns().to_vec(),
            feature_names: schema.feature_names(),
            fingerprint: schema.fingerprint(),
            serving,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureCoefficient {
    pub feature: String,
    pub coefficient: f64,
    pub mean: f64,
    pub scale: f64,
}

/// GET /v1/model body
#[derive(Debug, Clone, Serialize)]
pub struct ModelResponse {
    pub target: String,
    pub intercept: f64,
    pub features: Vec<FeatureCoefficient>,
    pub schema_fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TrainingMetadata>,
}

impl ModelResponse {
    pub fn from_bundle(bundle: &ModelBundle) -> Self {
        let scaler = bundle.scaler();
        let model = bundle.model();

        let features = bundle
            .schema()
            .feature_names()
            .into_iter()
            .enumerate()
            .map(|(i, feature)| FeatureCoefficient {
                feature,
                coefficient: model.coefficients()[i],
                mean: scaler.mean()[i],
                scale: scaler.scale()[i],
            })
            .collect();

        Self {
            target: bundle.schema().target().to_string(),
            intercept: model.intercept(),
            features,
            schema_fingerprint: bundle.schema().fingerprint(),
            metadata: bundle.metadata().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::sample_bundle;
    use crate::domain::InputValue;

    #[test]
    fn test_predict_request_accepts_numbers_and_strings() {
        let request: PredictRequest =
            serde_json::from_str(r#"{"inputs": {"Cycle_Time": 31.5, "Shift": "Night"}}"#).unwrap();

        assert_eq!(request.inputs["Cycle_Time"], InputValue::Number(31.5));
        assert_eq!(request.inputs["Shift"], InputValue::Text("Night".to_string()));
    }

    #[test]
    fn test_predict_response_shape() {
        let bundle = sample_bundle();
        let prediction = Prediction {
            value: 39.0,
            features: vec![35.0, 1.0],
        };

        let json = serde_json::to_value(PredictResponse::from_prediction(&prediction, &bundle))
            .unwrap();

        assert_eq!(json["prediction"], 39.0);
        assert_eq!(json["unit"], "Parts/Hour");
        assert_eq!(json["target"], "Parts_Per_Hour");
        assert_eq!(json["schema_fingerprint"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_schema_response_lists_rules() {
        let response = SchemaResponse::from_bundle(&sample_bundle(), ProjectionOptions::default());
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["encoding"], "label");
        assert_eq!(json["feature_names"], serde_json::json!(["Cycle_Time", "Shift"]));
        assert_eq!(json["columns"][1]["rule"]["kind"], "label");
        assert_eq!(json["serving"]["missing_values"], "impute");
    }

    #[test]
    fn test_model_response_pairs_coefficients_with_features() {
        let response = ModelResponse::from_bundle(&sample_bundle());

        assert_eq!(response.intercept, 40.0);
        assert_eq!(response.features[0].feature, "Cycle_Time");
        assert_eq!(response.features[0].coefficient, 2.0);
        assert_eq!(response.features[1].scale, 0.5);
        assert!(response.metadata.is_none());
    }
}
