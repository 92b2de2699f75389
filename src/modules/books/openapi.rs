use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    })
}

fn view_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookView" }
            }
        }
    })
}

/// OpenAPI fragment for the book module; paths are relative to its mount point.
pub fn spec() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List all books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All stored books", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/BookView" }
                        })),
                        "404": error_response("No books stored")
                    }
                }
            },
            "/create": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": view_body(),
                    "responses": {
                        "201": json_response("Book created", json!({
                            "$ref": "#/components/schemas/BookIdResponse"
                        })),
                        "400": error_response("Malformed request body"),
                        "422": error_response("Validation error")
                    }
                }
            },
            "/search": {
                "get": {
                    "summary": "Search books by author and/or published status",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "author",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string" }
                        },
                        {
                            "name": "published",
                            "in": "query",
                            "required": false,
                            "schema": { "type": "string", "enum": ["true", "false", "1", "0", "yes", "no", "on", "off"] }
                        }
                    ],
                    "responses": {
                        "200": json_response("Matching books", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        })),
                        "400": error_response("No filter given or invalid `published` value"),
                        "404": error_response("No book matches")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": json_response("The book", json!({
                            "$ref": "#/components/schemas/BookView"
                        })),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace the fields of a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": view_body(),
                    "responses": {
                        "200": json_response("The updated book", json!({
                            "$ref": "#/components/schemas/BookView"
                        })),
                        "404": error_response("Book not found"),
                        "422": error_response("Validation error")
                    }
                },
                "delete": {
                    "summary": "Delete a book by id",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": json_response("Deleted id, also returned for unknown ids", json!({
                            "$ref": "#/components/schemas/BookIdResponse"
                        }))
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Book module health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64", "description": "Store-assigned identifier" },
                        "author": { "type": ["string", "null"], "description": "Author of the book" },
                        "title": { "type": ["string", "null"], "description": "Title of the book" },
                        "published": { "type": "boolean", "description": "Whether the book is published" }
                    },
                    "required": ["id", "published"]
                },
                "BookView": {
                    "type": "object",
                    "properties": {
                        "author": { "type": ["string", "null"], "pattern": "^[a-zA-Z0-9 ]+$", "description": "Author of the book" },
                        "title": { "type": ["string", "null"], "pattern": "^[a-zA-Z0-9 ]+$", "description": "Title of the book" },
                        "published": { "type": "boolean", "description": "Whether the book is published" }
                    },
                    "required": ["published"]
                },
                "BookIdResponse": {
                    "type": "object",
                    "properties": {
                        "bookId": { "type": "integer", "format": "int64" }
                    },
                    "required": ["bookId"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let spec = spec();
        for path in ["/", "/create", "/search", "/{id}", "/health"] {
            assert!(spec["paths"][path].is_object(), "missing {path}");
        }
        for method in ["get", "put", "delete"] {
            assert!(spec["paths"]["/{id}"][method].is_object(), "missing {method}");
        }
    }
}
