//! Request bodies accepted by the REST handlers.
//!
//! Handlers take the raw JSON value and decode it one field at a time, so a
//! bad depth or an unknown lithology is reported under that field's name.
//! Unknown fields are ignored so clients may echo a fetched record (`id`,
//! `created_at`, `layers`, `thickness`) back on `PUT`.

use crate::error::{ApiError, ApiResult, NON_FIELD_ERRORS};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use welllog_core::{Depth, LayerPatch, Lithology, NewLayer, NewWell, WellId, WellPatch};

/// JSON object body whose fields are taken out and decoded individually.
struct BodyFields(Map<String, Value>);

impl BodyFields {
    fn new(body: Value) -> ApiResult<Self> {
        match body {
            Value::Object(fields) => Ok(Self(fields)),
            _ => Err(ApiError::invalid_request("request body must be a JSON object")
                .with_field_error(NON_FIELD_ERRORS, "expected a JSON object")),
        }
    }

    /// Decodes a field that must be present and non-null.
    fn required<T: DeserializeOwned>(&mut self, field: &'static str) -> ApiResult<T> {
        match self.0.remove(field) {
            None | Some(Value::Null) => Err(field_error(field, "this field is required")),
            Some(value) => decode(field, value),
        }
    }

    /// Decodes a field where absence and `null` both mean "not given".
    fn optional<T: DeserializeOwned>(&mut self, field: &'static str) -> ApiResult<Option<T>> {
        match self.0.remove(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => decode(field, value).map(Some),
        }
    }
}

fn decode<T: DeserializeOwned>(field: &'static str, value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|err| field_error(field, err.to_string()))
}

fn field_error(field: &'static str, message: impl Into<String>) -> ApiError {
    let message = message.into();
    ApiError::invalid_request(format!("{field}: {message}")).with_field_error(field, message)
}

/// Full well body for `POST` and `PUT`.
#[derive(Debug, Clone)]
pub struct WellBody {
    pub name: String,
    pub area: String,
    pub structure: String,
    pub design_depth: Depth,
}

impl TryFrom<Value> for WellBody {
    type Error = ApiError;

    fn try_from(body: Value) -> ApiResult<Self> {
        let mut fields = BodyFields::new(body)?;
        Ok(Self {
            name: fields.required("name")?,
            area: fields.required("area")?,
            structure: fields.required("structure")?,
            design_depth: fields.required("design_depth")?,
        })
    }
}

impl WellBody {
    pub fn into_new_well(self) -> NewWell {
        NewWell::new(self.name, self.area, self.structure, self.design_depth)
    }

    /// Full replacement expressed as a patch touching every field.
    pub fn into_patch(self) -> WellPatch {
        WellPatch {
            name: Some(self.name),
            area: Some(self.area),
            structure: Some(self.structure),
            design_depth: Some(self.design_depth),
        }
    }
}

/// Partial well body for `PATCH`.
#[derive(Debug, Clone, Default)]
pub struct WellPatchBody {
    pub name: Option<String>,
    pub area: Option<String>,
    pub structure: Option<String>,
    pub design_depth: Option<Depth>,
}

impl TryFrom<Value> for WellPatchBody {
    type Error = ApiError;

    fn try_from(body: Value) -> ApiResult<Self> {
        let mut fields = BodyFields::new(body)?;
        Ok(Self {
            name: fields.optional("name")?,
            area: fields.optional("area")?,
            structure: fields.optional("structure")?,
            design_depth: fields.optional("design_depth")?,
        })
    }
}

impl From<WellPatchBody> for WellPatch {
    fn from(value: WellPatchBody) -> Self {
        WellPatch {
            name: value.name,
            area: value.area,
            structure: value.structure,
            design_depth: value.design_depth,
        }
    }
}

/// Full layer body for `POST` and `PUT`.
///
/// `well` is required for direct creation and ignored by the well-scoped
/// `add_layer` route, which takes the well from the path.
#[derive(Debug, Clone)]
pub struct LayerBody {
    pub well: Option<WellId>,
    pub start_depth: Depth,
    pub end_depth: Depth,
    pub lithology: Lithology,
    pub description: Option<String>,
}

impl TryFrom<Value> for LayerBody {
    type Error = ApiError;

    fn try_from(body: Value) -> ApiResult<Self> {
        let mut fields = BodyFields::new(body)?;
        Ok(Self {
            well: fields.optional("well")?,
            start_depth: fields.required("start_depth")?,
            end_depth: fields.required("end_depth")?,
            lithology: fields.required("lithology")?,
            description: fields.optional("description")?,
        })
    }
}

impl LayerBody {
    /// Builds a layer for direct creation; the body must name its well.
    pub fn into_new_layer(self) -> ApiResult<NewLayer> {
        let well_id = self
            .well
            .ok_or_else(|| field_error("well", "this field is required"))?;
        Ok(self.into_new_layer_for(well_id))
    }

    /// Builds a layer under `well_id`, ignoring any `well` in the body.
    pub fn into_new_layer_for(self, well_id: WellId) -> NewLayer {
        NewLayer::new(well_id, self.start_depth, self.end_depth, self.lithology)
            .with_description(self.description.unwrap_or_default())
    }

    /// Full replacement; an omitted `description` is left unchanged.
    pub fn into_patch(self) -> LayerPatch {
        LayerPatch {
            well_id: self.well,
            start_depth: Some(self.start_depth),
            end_depth: Some(self.end_depth),
            lithology: Some(self.lithology),
            description: self.description,
        }
    }
}

/// Partial layer body for `PATCH`.
#[derive(Debug, Clone, Default)]
pub struct LayerPatchBody {
    pub well: Option<WellId>,
    pub start_depth: Option<Depth>,
    pub end_depth: Option<Depth>,
    pub lithology: Option<Lithology>,
    pub description: Option<String>,
}

impl TryFrom<Value> for LayerPatchBody {
    type Error = ApiError;

    fn try_from(body: Value) -> ApiResult<Self> {
        let mut fields = BodyFields::new(body)?;
        Ok(Self {
            well: fields.optional("well")?,
            start_depth: fields.optional("start_depth")?,
            end_depth: fields.optional("end_depth")?,
            lithology: fields.optional("lithology")?,
            description: fields.optional("description")?,
        })
    }
}

impl From<LayerPatchBody> for LayerPatch {
    fn from(value: LayerPatchBody) -> Self {
        LayerPatch {
            well_id: value.well,
            start_depth: value.start_depth,
            end_depth: value.end_depth,
            lithology: value.lithology,
            description: value.description,
        }
    }
}

/// Query string for `GET /api/layers`.
///
/// `well` stays text until [`LayerFilter::well_id`] so a malformed id is
/// reported against the `well` field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayerFilter {
    pub well: Option<String>,
}

impl LayerFilter {
    pub fn well_id(&self) -> ApiResult<Option<WellId>> {
        self.well
            .as_deref()
            .map(|raw| {
                raw.trim()
                    .parse::<WellId>()
                    .map_err(|err| field_error("well", err.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerBody, LayerFilter, LayerPatchBody, WellBody};
    use serde_json::json;
    use welllog_core::{Depth, LayerPatch, Lithology};

    #[test]
    fn layer_body_accepts_numeric_and_string_depths() {
        let body = LayerBody::try_from(json!({
            "start_depth": 0,
            "end_depth": "2.50",
            "lithology": "SANDY_LOAM",
            "thickness": "2.50"
        }))
        .unwrap();

        assert_eq!(body.start_depth, Depth::ZERO);
        assert_eq!(body.end_depth, Depth::from_centimeters(250));
        assert_eq!(body.lithology, Lithology::SandyLoam);

        let err = body.into_new_layer().unwrap_err();
        assert!(err.fields().contains_key("well"));
    }

    #[test]
    fn unknown_lithology_is_reported_on_its_field() {
        let err = LayerBody::try_from(json!({
            "start_depth": 0,
            "end_depth": 1,
            "lithology": "GRAVEL"
        }))
        .unwrap_err();
        assert_eq!(err.fields().len(), 1);
        assert!(err.fields()["lithology"][0].contains("GRAVEL"));
    }

    #[test]
    fn well_body_names_missing_and_malformed_fields() {
        let missing = WellBody::try_from(json!({
            "area": "North",
            "structure": "Dam",
            "design_depth": 3
        }))
        .unwrap_err();
        assert_eq!(
            missing.fields()["name"],
            vec!["this field is required".to_string()]
        );

        let too_precise = WellBody::try_from(json!({
            "name": "W-1",
            "area": "North",
            "structure": "Dam",
            "design_depth": "1.005"
        }))
        .unwrap_err();
        assert!(too_precise.fields()["design_depth"][0].contains("decimal places"));

        let not_object = WellBody::try_from(json!(["W-1"])).unwrap_err();
        assert!(not_object.fields().contains_key("non_field_errors"));
    }

    #[test]
    fn patch_body_leaves_absent_fields_untouched() {
        let body = LayerPatchBody::try_from(json!({ "end_depth": 4, "description": null }))
            .unwrap();
        let patch = LayerPatch::from(body);
        assert_eq!(patch.end_depth, Some(Depth::from_whole_meters(4)));
        assert_eq!(patch.start_depth, None);
        assert_eq!(patch.description, None);
    }

    #[test]
    fn layer_filter_reports_malformed_well_id() {
        let filter = LayerFilter {
            well: Some("not-a-uuid".to_string()),
        };
        let err = filter.well_id().unwrap_err();
        assert!(err.fields().contains_key("well"));

        assert_eq!(LayerFilter::default().well_id().unwrap(), None);
    }
}
