// crates/session-check-api/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared session documents and log helpers for API tests.
// Purpose: Provide one fully valid document that every test can corrupt.
// Dependencies: session-check-api, session-check-core, serde_json
// ============================================================================

//! ## Overview
//! [`full_session`] populates every top-level section, with the cross
//! references between them resolved. Tests mutate a single field through
//! [`set_at`] and assert on the diagnostics that change.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;
use session_check_core::PathSegment;
use session_check_core::ValidationLog;

// ============================================================================
// SECTION: Documents
// ============================================================================

/// Smallest document with no diagnostics.
pub fn minimal_session() -> Value {
    json!({
        "settings": {"iconUrl": "https://example.com/icons"},
        "appBar": {"data": {}}
    })
}

/// Document using every section, valid and without unknown fields.
pub fn full_session() -> Value {
    json!({
        "extraKwargs": {"wipeExisting": true},
        "settings": {
            "iconUrl": "https://example.com/icons",
            "sync": {
                "mapSync": {
                    "name": "Maps",
                    "showToggle": true,
                    "value": false,
                    "data": {"m": ["maps"]}
                }
            },
            "time": {"timeLength": 2, "timeUnits": "Year"},
            "defaults": {"precision": 2, "unitPlacement": "after"},
            "demo": {"dashboard": {"scrollSpeed": 1, "displayTime": 5}}
        },
        "appBar": {
            "data": {
                "session": {"icon": "md/MdApi", "type": "session", "bar": "upperLeft"},
                "dashboard": {"icon": "md/MdDashboard", "type": "page", "bar": "upperLeft"},
                "controls": {
                    "icon": "md/MdBuild",
                    "type": "pane",
                    "variant": "modal",
                    "bar": "upperRight",
                    "color": "rgba(10, 20, 30, 1)"
                },
                "solve": {
                    "icon": "md/MdRocket",
                    "type": "button",
                    "bar": "lowerLeft",
                    "apiCommand": "solve",
                    "apiCommandKeys": ["mapFeatures"]
                }
            }
        },
        "panes": {
            "data": {
                "controls": {
                    "name": "Controls",
                    "props": {
                        "section": {"name": "Section", "type": "head"},
                        "budget": {
                            "name": "Budget",
                            "type": "num",
                            "variant": "slider",
                            "minValue": 0,
                            "maxValue": 100,
                            "unit": "USD"
                        },
                        "mode": {
                            "name": "Mode",
                            "type": "selector",
                            "variant": "dropdown",
                            "options": {"fast": {"name": "Fast"}, "slow": {"name": "Slow"}}
                        }
                    },
                    "values": {"budget": 50, "mode": ["fast"]},
                    "layout": {
                        "type": "grid",
                        "numColumns": 1,
                        "numRows": "auto",
                        "data": {
                            "col1_row1": {
                                "type": "item",
                                "itemId": "section",
                                "column": 1,
                                "row": 1
                            },
                            "col1_row2": {"type": "item", "itemId": "budget", "column": 1, "row": 2}
                        }
                    }
                }
            }
        },
        "mapFeatures": {
            "data": {
                "warehouse": {
                    "type": "node",
                    "name": "Warehouses",
                    "props": {"capacity": {"name": "Capacity", "type": "num", "variant": "field"}},
                    "data": {
                        "location": {"latitude": [43.7, 39.7], "longitude": [-79.4, -104.9]},
                        "valueLists": {"capacity": [100, 200]}
                    }
                },
                "route": {
                    "type": "arc",
                    "name": "Routes",
                    "props": {"load": {"name": "Load", "type": "num", "variant": "field"}},
                    "data": {
                        "location": {
                            "startLatitude": [43.7],
                            "startLongitude": [-79.4],
                            "endLatitude": [39.7],
                            "endLongitude": [-104.9]
                        },
                        "valueLists": {"load": [5]}
                    }
                }
            }
        },
        "maps": {
            "data": {
                "map1": {
                    "name": "Map 1",
                    "currentProjection": "mercator",
                    "defaultViewport": {
                        "latitude": 40,
                        "longitude": -90,
                        "zoom": 3,
                        "minZoom": 1,
                        "maxZoom": 12
                    },
                    "optionalViewports": {
                        "ov1": {
                            "icon": "md/MdZoomIn",
                            "name": "Zoomed",
                            "latitude": 40,
                            "longitude": -90,
                            "zoom": 6
                        }
                    },
                    "legendGroups": {
                        "lg1": {
                            "name": "Legend",
                            "data": {
                                "warehouse": {
                                    "value": true,
                                    "colorBy": "capacity",
                                    "sizeBy": "capacity",
                                    "icon": "md/MdStore",
                                    "colorByOptions": {
                                        "capacity": {
                                            "startGradientColor": "rgba(0, 0, 255, 1)",
                                            "endGradientColor": "rgba(255, 0, 0, 1)"
                                        }
                                    },
                                    "sizeByOptions": {
                                        "capacity": {"startSize": "5px", "endSize": "20px"}
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
        "globalOutputs": {
            "props": {"cost": {"name": "Cost", "type": "num", "variant": "field"}},
            "values": {"cost": 1200}
        },
        "groupedOutputs": {
            "groupings": {
                "geo": {
                    "name": "Geography",
                    "levels": {
                        "state": {"name": "State"},
                        "city": {"name": "City", "parent": "state"}
                    },
                    "data": {
                        "id": ["a", "b"],
                        "state": ["ON", "CO"],
                        "city": ["Toronto", "Denver"]
                    }
                }
            },
            "data": {
                "sales": {
                    "stats": {"revenue": {"name": "Revenue", "type": "num", "variant": "field"}},
                    "valueLists": {"revenue": [10, 20]},
                    "groupLists": {"geo": ["a", "b"]}
                }
            }
        },
        "pages": {
            "currentPage": "dashboard",
            "data": {
                "dashboard": {
                    "pageLayout": [
                        {"type": "map", "mapId": "map1", "showToolbar": false},
                        {"type": "globalOutput", "globalOutputId": ["cost"]},
                        {
                            "type": "groupedOutput",
                            "groupedOutputDataId": "sales",
                            "statId": "revenue",
                            "groupingId": ["geo"],
                            "groupingLevel": ["state"],
                            "chartType": "bar"
                        }
                    ]
                }
            }
        }
    })
}

// ============================================================================
// SECTION: Mutation
// ============================================================================

/// Replaces the value at `path` (mapping keys or decimal indices).
///
/// Returns an error when an intermediate node is missing.
pub fn set_at(document: &mut Value, path: &[&str], value: Value) -> Result<(), String> {
    let Some((last, parents)) = path.split_last() else {
        *document = value;
        return Ok(());
    };
    let mut cursor = document;
    for segment in parents {
        cursor = step(cursor, segment).ok_or_else(|| format!("missing segment {segment}"))?;
    }
    match cursor {
        Value::Object(fields) => {
            fields.insert((*last).to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index: usize = last.parse().map_err(|_| format!("bad index {last}"))?;
            let slot = items.get_mut(index).ok_or_else(|| format!("missing index {index}"))?;
            *slot = value;
            Ok(())
        }
        _ => Err(format!("cannot set {last} on a scalar")),
    }
}

/// Removes the mapping key at `path`.
pub fn remove_at(document: &mut Value, path: &[&str]) -> Result<(), String> {
    let Some((last, parents)) = path.split_last() else {
        return Err("empty path".to_string());
    };
    let mut cursor = document;
    for segment in parents {
        cursor = step(cursor, segment).ok_or_else(|| format!("missing segment {segment}"))?;
    }
    cursor
        .as_object_mut()
        .and_then(|fields| fields.remove(*last))
        .map(|_| ())
        .ok_or_else(|| format!("missing key {last}"))
}

/// Moves one level down by mapping key or sequence index.
fn step<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(fields) => fields.get_mut(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get_mut(index)),
        _ => None,
    }
}

// ============================================================================
// SECTION: Log Helpers
// ============================================================================

/// Builds a path of mapping keys.
pub fn key_path(segments: &[&str]) -> Vec<PathSegment> {
    segments.iter().map(|segment| PathSegment::from(*segment)).collect()
}

/// Rendered `path: message` lines of every error.
pub fn error_lines(log: &ValidationLog) -> Vec<String> {
    log.errors().map(|entry| format!("{}: {}", entry.path_display(), entry.message)).collect()
}

/// Rendered `path: message` lines of every warning.
pub fn warning_lines(log: &ValidationLog) -> Vec<String> {
    log.warnings().map(|entry| format!("{}: {}", entry.path_display(), entry.message)).collect()
}

/// Fails with the log's errors unless it has none.
pub fn expect_no_errors(log: &ValidationLog) -> Result<(), String> {
    if log.has_errors() {
        return Err(format!("unexpected errors: {}", error_lines(log).join(" | ")));
    }
    Ok(())
}

/// Fails unless an error rendered at `path` has a message containing `needle`.
///
/// `path` uses the rendered form, e.g. `pages.data.home.pageLayout[0].mapId`.
pub fn expect_error_at(log: &ValidationLog, path: &str, needle: &str) -> Result<(), String> {
    if log.errors().any(|entry| entry.path_display() == path && entry.message.contains(needle)) {
        return Ok(());
    }
    Err(format!("no error at {path} containing {needle}; errors: {}", error_lines(log).join(" | ")))
}
