//! OpenAPI description of the todo routes and a browsable page for it.

use axum::Json;
use axum::response::Html;
use serde_json::{Value, json};

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Todo API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/api-docs/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

pub fn openapi_document() -> Value {
    let id_param = json!([{
        "in": "path",
        "name": "id",
        "required": true,
        "description": "The Todo ID",
        "schema": { "type": "string" }
    }]);
    let todo_body = json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/TodoInput" }
            }
        }
    });
    let todo_response = |description: &str| {
        json!({
            "description": description,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Todo" }
                }
            }
        })
    };
    let unauthorized = json!({ "description": "Unauthorized" });
    let not_found = json!({ "description": "Todo not found" });
    let invalid = json!({ "description": "Invalid input" });

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Todo API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API documentation for Todo app"
        },
        "tags": [{ "name": "Todos", "description": "Todo operations" }],
        "security": [{ "bearerAuth": [] }],
        "paths": {
            "/api/todos": {
                "get": {
                    "summary": "Get all Todos for the authenticated user",
                    "tags": ["Todos"],
                    "responses": {
                        "200": {
                            "description": "A list of Todo items",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Todo" }
                                    }
                                }
                            }
                        },
                        "401": unauthorized
                    }
                },
                "post": {
                    "summary": "Create a new Todo",
                    "tags": ["Todos"],
                    "requestBody": todo_body,
                    "responses": {
                        "201": todo_response("Todo created successfully"),
                        "400": invalid,
                        "401": unauthorized
                    }
                }
            },
            "/api/todos/{id}": {
                "get": {
                    "summary": "Get a Todo by ID",
                    "tags": ["Todos"],
                    "parameters": id_param,
                    "responses": {
                        "200": todo_response("The Todo item"),
                        "401": unauthorized,
                        "404": not_found
                    }
                },
                "put": {
                    "summary": "Update a Todo by ID",
                    "tags": ["Todos"],
                    "parameters": id_param,
                    "requestBody": todo_body,
                    "responses": {
                        "200": todo_response("The updated Todo item"),
                        "400": invalid,
                        "401": unauthorized,
                        "404": not_found
                    }
                },
                "delete": {
                    "summary": "Delete a Todo by ID",
                    "tags": ["Todos"],
                    "parameters": id_param,
                    "responses": {
                        "200": {
                            "description": "Todo deleted",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Message" }
                                }
                            }
                        },
                        "401": unauthorized,
                        "404": not_found
                    }
                }
            },
            "/api/todos/{id}/status": {
                "put": {
                    "summary": "Toggle the completion status of a Todo",
                    "tags": ["Todos"],
                    "parameters": id_param,
                    "responses": {
                        "200": todo_response("The Todo item with its status flipped"),
                        "401": unauthorized,
                        "404": not_found
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Todo": {
                    "type": "object",
                    "properties": {
                        "_id": { "type": "string" },
                        "title": { "type": "string" },
                        "status": { "type": "boolean" },
                        "userId": { "type": "string" },
                        "createdAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    }
                },
                "TodoInput": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "minLength": 1,
                            "description": "Title of the todo",
                            "example": "Buy groceries"
                        },
                        "status": {
                            "type": "boolean",
                            "description": "Status of the todo (completed or not)",
                            "example": false
                        }
                    },
                    "required": ["title"]
                },
                "Message": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            },
            "securitySchemes": {
                "bearerAuth": {
                    "type": "http",
                    "scheme": "bearer",
                    "bearerFormat": "JWT"
                }
            }
        }
    })
}

pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

pub async fn docs_page() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
