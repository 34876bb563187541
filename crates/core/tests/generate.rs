//! End-to-end generation through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashSet;

use clientgen_core::{GenerateError, GenerationOptions, ModuleFormat, Schema, generate, print_sdl};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn movies_openapi() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": { "title": "movies", "version": "1.0.0" },
        "paths": {
            "/movies": {
                "get": {
                    "operationId": "getMovies",
                    "parameters": [
                        { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                    ],
                    "responses": {
                        "200": {
                            "description": "list",
                            "content": {
                                "application/json": {
                                    "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Movie" } }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "operationId": "getMovies",
                    "requestBody": {
                        "required": true,
                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Movie" } } }
                    },
                    "responses": {
                        "201": {
                            "description": "created",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Movie" } } }
                        },
                        "400": {
                            "description": "invalid",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
                        }
                    }
                }
            },
            "/movies/{id}": {
                "get": {
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                    "responses": {
                        "200": {
                            "description": "one",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Movie" } } }
                        },
                        "404": {
                            "description": "missing",
                            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
                        },
                        "default": { "description": "unexpected" }
                    }
                },
                "delete": {
                    "operationId": "getMovies",
                    "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                    "responses": { "204": { "description": "deleted" } }
                }
            }
        },
        "components": {
            "schemas": {
                "Movie": {
                    "type": "object",
                    "required": ["title"],
                    "properties": {
                        "id": { "type": "integer" },
                        "title": { "type": "string" },
                        "year": { "type": "integer", "nullable": true }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            }
        }
    })
}

fn graphql_introspection() -> Value {
    json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": { "name": "Mutation" },
                "subscriptionType": null,
                "types": [
                    { "kind": "OBJECT", "name": "Query", "fields": [
                        { "name": "movies", "args": [], "type": { "kind": "LIST", "ofType": { "kind": "OBJECT", "name": "Movie" } } }
                    ] },
                    { "kind": "OBJECT", "name": "Mutation", "fields": [
                        { "name": "saveMovie", "args": [], "type": { "kind": "OBJECT", "name": "Movie" } }
                    ] },
                    { "kind": "OBJECT", "name": "Movie", "fields": [
                        { "name": "id", "args": [], "type": { "kind": "NON_NULL", "ofType": { "kind": "SCALAR", "name": "ID" } } },
                        { "name": "title", "args": [], "type": { "kind": "SCALAR", "name": "String" } },
                        { "name": "year", "args": [], "type": { "kind": "SCALAR", "name": "Int" } },
                        { "name": "actors", "args": [], "type": { "kind": "LIST", "ofType": { "kind": "OBJECT", "name": "Actor" } } }
                    ] },
                    { "kind": "OBJECT", "name": "Actor", "fields": [
                        { "name": "name", "args": [], "type": { "kind": "SCALAR", "name": "String" } }
                    ] },
                    { "kind": "SCALAR", "name": "ID" },
                    { "kind": "SCALAR", "name": "String" },
                    { "kind": "SCALAR", "name": "Int" },
                    { "kind": "SCALAR", "name": "Boolean" },
                    { "kind": "OBJECT", "name": "__Schema", "fields": [] },
                    { "kind": "OBJECT", "name": "__Type", "fields": [] }
                ]
            }
        }
    })
}

fn method_names(types: &str) -> Vec<String> {
    types
        .lines()
        .filter(|l| l.starts_with("  ") && l.contains("(req"))
        .map(|l| l.trim().split('(').next().unwrap().to_string())
        .collect()
}

#[test]
fn operation_ids_are_pairwise_distinct() {
    let schema = Schema::from_value(movies_openapi()).unwrap();
    let artifact = generate(&schema, &GenerationOptions::new("movies")).unwrap();

    let names = method_names(&artifact.types);
    assert_eq!(
        names,
        vec!["getMovies", "postMovies", "getMoviesById", "deleteMoviesById"]
    );
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn required_properties_follow_props_optional() {
    let schema = Schema::from_value(movies_openapi()).unwrap();

    let mut options = GenerationOptions::new("movies");
    options.props_optional = false;
    let strict = generate(&schema, &options).unwrap();
    assert!(strict.types.contains(
        "export interface Movie {\n  'id'?: number;\n  'title': string;\n  'year'?: number | null;\n}\n"
    ));

    let relaxed = generate(&schema, &GenerationOptions::new("movies")).unwrap();
    assert!(relaxed.types.contains("  'title'?: string;\n"));
}

#[test]
fn components_are_declared_once() {
    let schema = Schema::from_value(movies_openapi()).unwrap();
    let artifact = generate(&schema, &GenerationOptions::new("movies")).unwrap();
    assert_eq!(artifact.types.matches("export interface Movie {").count(), 1);
    assert_eq!(artifact.types.matches("export interface Error {").count(), 1);
}

#[test]
fn full_response_wraps_two_classes() {
    let schema = Schema::from_value(movies_openapi()).unwrap();
    let artifact = generate(&schema, &GenerationOptions::new("movies")).unwrap();
    assert!(artifact.types.contains(
        "export type GetMoviesByIdResponses = GetMoviesByIdResponse2xx | GetMoviesByIdResponse4xx;"
    ));
    assert!(artifact.types.contains(
        "export type GetMoviesByIdResponse2xx = FullResponse<Movie, StatusCode2xx>;"
    ));
    assert!(artifact.types.contains(
        "export type GetMoviesByIdResponse4xx = FullResponse<Error, StatusCode4xx>;"
    ));
    assert!(!artifact.types.contains("GetMoviesByIdResponse5xx"));
}

#[test]
fn output_is_deterministic() {
    for value in [movies_openapi(), graphql_introspection()] {
        let mut options = GenerationOptions::new("client");
        options.module_format = ModuleFormat::Cjs;
        let first = generate(&Schema::from_value(value.clone()).unwrap(), &options).unwrap();
        let second = generate(&Schema::from_value(value).unwrap(), &options).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn graphql_objects_yield_one_interface_each() {
    let schema = Schema::from_value(graphql_introspection()).unwrap();
    let artifact = generate(&schema, &GenerationOptions::new("movies")).unwrap();

    assert_eq!(artifact.types.matches("export interface Movie {").count(), 1);
    assert_eq!(artifact.types.matches("export interface Actor {").count(), 1);
    assert!(!artifact.types.contains("interface Query"));
    assert!(!artifact.types.contains("interface Mutation"));
    assert!(!artifact.types.contains("__Schema"));
    assert!(artifact.types.contains("  'year'?: number;\n"));
    assert!(artifact.types.contains("  'actors'?: Array<Actor>;\n"));
}

#[test]
fn unknown_graphql_scalar_is_reported() {
    let mut value = graphql_introspection();
    value["data"]["__schema"]["types"][2]["fields"][2]["type"]["name"] = json!("Long");
    let schema = Schema::from_value(value).unwrap();
    let err = generate(&schema, &GenerationOptions::new("movies")).unwrap_err();
    assert!(matches!(&err, GenerateError::UnknownType { name, .. } if name == "Long"));
    assert!(err.to_string().contains("Long"));
}

#[test]
fn sdl_round_trip_contains_object_types() {
    let Schema::GraphQl(schema) = Schema::from_value(graphql_introspection()).unwrap() else {
        unreachable!("introspection results are GraphQL schemas");
    };
    let sdl = print_sdl(&schema);
    assert!(sdl.starts_with("type Query {\n  movies: [Movie]\n}\n"));
    assert!(sdl.contains("type Movie {\n  id: ID!\n"));
    assert!(!sdl.contains("scalar ID"));
    assert!(!sdl.contains("schema {"));
}

#[test]
fn frontend_client_for_openapi() {
    let schema = Schema::from_value(movies_openapi()).unwrap();
    let mut options = GenerationOptions::new("api");
    options.is_frontend = true;
    let artifact = generate(&schema, &options).unwrap();

    assert!(artifact.types.contains("setBaseUrl(baseUrl: string): void;"));
    assert!(artifact.implementation.contains("export const getMoviesById = async (request) => {"));
    assert!(artifact.implementation.contains("export default function build (url, options) {"));
    assert!(!artifact.implementation.contains("@clientgen/runtime"));
}

#[test]
fn module_format_outside_allowed_set_is_rejected() {
    let err = "umd".parse::<ModuleFormat>().unwrap_err();
    assert!(matches!(err, GenerateError::InvalidConfiguration(_)));
    assert_eq!(
        err.to_string(),
        "Invalid module format: umd. Valid values are 'esm' or 'cjs'"
    );
    assert_eq!("cjs".parse::<ModuleFormat>().unwrap(), ModuleFormat::Cjs);
}
