use crate::config::ServerConfig;
use crate::coordinates::PolarCoord;
use crate::conversion::{Converted, InputSystem, convert, lat_long_from_bearings, parse_input};
use crate::error::CartError;
use crate::query_parameters::QueryParameters;
use anyhow::Result;
use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::any::Any;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

const JSON_SUFFIX: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult = Result<Json<Converted>, ApiError>;

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_request(err: impl ToString) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, err.to_string())
}

/// Malformed input is the client's fault, a well-formed but unsupported coordinate is not
/// processable
fn cart_error(err: CartError) -> ApiError {
    let status = match err {
        CartError::Parse { .. } | CartError::PrecisionMismatch { .. } => StatusCode::BAD_REQUEST,
        CartError::Domain { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };
    api_error(status, err.to_string())
}

/// Strip a serialisation suffix such as `.json` from the last path segment. Only an
/// alphabetic suffix counts, so decimals inside a literal are left alone.
fn strip_serialisation(value: &str) -> Result<&str, ApiError> {
    match value.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphabetic()) => {
            if ext.eq_ignore_ascii_case(JSON_SUFFIX) {
                Ok(stem)
            } else {
                Err(bad_request(format!(
                    "Unsupported serialisation format: '.{ext}'"
                )))
            }
        }
        _ => Ok(value),
    }
}

fn respond(pc: &PolarCoord, params: &QueryParameters) -> ApiResult {
    let format = params.output_format().map_err(bad_request)?;
    let options = params.conversion_options().map_err(bad_request)?;
    let converted = convert(pc, format, &options).map_err(cart_error)?;
    Ok(Json(converted))
}

fn convert_literal(system: InputSystem, value: &str, params: &QueryParameters) -> ApiResult {
    let literal = strip_serialisation(value)?;
    tracing::debug!(%system, literal, "converting");
    let pc = parse_input(system, literal).map_err(|err| {
        tracing::debug!(%system, literal, "conversion failed: {err}");
        cart_error(err)
    })?;
    respond(&pc, params)
}

#[axum::debug_handler]
async fn index() -> &'static str {
    "Cartography transformation"
}

#[axum::debug_handler]
async fn bmn(Path(value): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    convert_literal(InputSystem::Bmn, &value, &params)
}

#[axum::debug_handler]
async fn utm(Path(value): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    convert_literal(InputSystem::Utm, &value, &params)
}

#[axum::debug_handler]
async fn osgb36(Path(value): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    convert_literal(InputSystem::Osgb36, &value, &params)
}

#[axum::debug_handler]
async fn swiss(Path(value): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    convert_literal(InputSystem::Swiss, &value, &params)
}

#[axum::debug_handler]
async fn geohash(Path(value): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    convert_literal(InputSystem::Geohash, &value, &params)
}

/// `latlong` (optionally with a serialisation suffix) taking the bearings from `lat` and `long`
#[axum::debug_handler]
async fn latlong(Path(endpoint): Path<String>, Query(params): Query<QueryParameters>) -> ApiResult {
    let stem = strip_serialisation(&endpoint)?;
    if stem != InputSystem::LatLong.name() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Unknown resource: '{endpoint}'"),
        ));
    }

    let lat = params.lat.as_deref().unwrap_or_default();
    let long = params.long.as_deref().unwrap_or_default();
    let pc = lat_long_from_bearings(lat, long).map_err(|err| {
        bad_request(format!("Not a bearing: lat '{lat}', long '{long}' ({err})"))
    })?;
    respond(&pc, &params)
}

#[axum::debug_handler]
async fn latlong_with_value(Path(_value): Path<String>) -> ApiResult {
    Err(bad_request(
        "Latlong doesn't accept an input value. Use parameters instead",
    ))
}

/// Turns a panic inside a handler into a JSON 500 response
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("request handler panicked: {message}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

pub fn router(config: &ServerConfig) -> Result<Router> {
    let api = Router::new()
        .route("/bmn/{literal}", get(bmn))
        .route("/utm/{literal}", get(utm))
        .route("/osgb36/{literal}", get(osgb36))
        .route("/swiss/{literal}", get(swiss))
        .route("/geohash/{literal}", get(geohash))
        .route("/latlong/{literal}", get(latlong_with_value))
        .route("/{endpoint}", get(latlong));

    Ok(Router::new()
        .route("/", get(index))
        .nest(&config.api_prefix()?, api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(panic_response)))
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    let app = router(&config)?;

    let addr = config.socket_addr()?;
    tracing::info!(
        "Starting server on http://{addr}, API under {}",
        config.api_prefix()?
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmn::{bmn_to_wgs84, parse_bmn};
    use crate::coordinates::LatLongFormat;

    fn params(outputformat: &str) -> Query<QueryParameters> {
        Query(QueryParameters {
            outputformat: Some(outputformat.to_string()),
            ..Default::default()
        })
    }

    fn path(value: &str) -> Path<String> {
        Path(value.to_string())
    }

    #[test]
    fn test_strip_serialisation() {
        assert_eq!(strip_serialisation("NN166712.json").unwrap(), "NN166712");
        assert_eq!(strip_serialisation("NN166712").unwrap(), "NN166712");
        assert_eq!(
            strip_serialisation("33U 601779.5 5340220.25").unwrap(),
            "33U 601779.5 5340220.25"
        );
        let (status, Json(body)) = strip_serialisation("u27w.xml").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Unsupported serialisation format: '.xml'");
    }

    #[test]
    fn test_cart_error_status() {
        assert_eq!(cart_error(CartError::parse("x", 0)).0, StatusCode::BAD_REQUEST);
        assert_eq!(
            cart_error(CartError::PrecisionMismatch {
                easting: 2,
                northing: 3
            })
            .0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            cart_error(CartError::domain("nope")).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn test_index() {
        assert_eq!(index().await, "Cartography transformation");
    }

    #[tokio::test]
    async fn test_bmn_default_output() {
        let Json(converted) = bmn(path("M28 592270 272290.json"), Query(Default::default()))
            .await
            .unwrap();
        let pc = bmn_to_wgs84(&parse_bmn("M28 592270 272290").unwrap()).unwrap();
        assert_eq!(converted.as_str(), pc.format(LatLongFormat::Deg));
    }

    #[tokio::test]
    async fn test_geohash_to_utm() {
        let Json(converted) = geohash(path("u27w"), params("utm")).await.unwrap();
        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json["UTMCoord"]["Zone"], "33U");
    }

    #[tokio::test]
    async fn test_osgb36_to_latlongdeg() {
        let Json(converted) = osgb36(path("NN166712"), params("latlongdeg")).await.unwrap();
        let json = serde_json::to_value(&converted).unwrap();
        assert_eq!(json["Fmt"], "dms");
        assert!(json["Lat"].as_str().unwrap().starts_with("N 56°47'"), "{json}");
    }

    #[tokio::test]
    async fn test_swiss_to_geohash() {
        let query = Query(QueryParameters {
            outputformat: Some("geohash".to_string()),
            bits: Some("10".to_string()),
            ..Default::default()
        });
        let Json(converted) = swiss(path("y:600000 x:200000"), query).await.unwrap();
        assert_eq!(converted.as_str().len(), 4);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let (status, Json(body)) = utm(path("33U 601779"), Query(Default::default()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("unable to parse"), "{}", body.error);
    }

    #[tokio::test]
    async fn test_domain_error() {
        let (status, _) = bmn(path("M28 592270 272290"), params("swiss"))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_bad_geohash_bits() {
        let query = Query(QueryParameters {
            outputformat: Some("geohash".to_string()),
            bits: Some("abc".to_string()),
            ..Default::default()
        });
        let (status, Json(body)) = geohash(path("u27w"), query).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("\"abc\""), "{}", body.error);
    }

    #[tokio::test]
    async fn test_unsupported_output_format() {
        let (status, Json(body)) = geohash(path("u27w"), params("kml")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Unsupported output format: 'kml'");
    }

    #[tokio::test]
    async fn test_latlong() {
        let query = Query(QueryParameters {
            lat: Some("N48°12'29.52''".to_string()),
            long: Some("16.3738°".to_string()),
            ..Default::default()
        });
        let Json(converted) = latlong(path("latlong.json"), query).await.unwrap();
        assert_eq!(converted.as_str(), "lat: 48.2082°, long: 16.3738°");
    }

    #[tokio::test]
    async fn test_latlong_errors() {
        let (status, _) = latlong(path("latlong"), Query(Default::default()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = latlong(path("elsewhere"), Query(Default::default()))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = latlong_with_value(path("48,16")).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_panic_response() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = panic_response(Box::new(42_u8));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_router() {
        assert!(router(&ServerConfig::default()).is_ok());
        let config = ServerConfig {
            api_root: "/".to_string(),
            ..Default::default()
        };
        assert!(router(&config).is_err());
    }
}
