//! Canned backend payloads.

use serde_json::{json, Value};

pub fn kpi_summary() -> Value {
    json!({
        "casos_atuacao": 3,
        "alertas_atuacao": 22,
        "casos_instabilidade": 0,
        "alertas_instabilidade": 0,
        "casos_sucesso_parcial": 5,
        "alertas_sucesso_parcial": 9,
        "taxa_sucesso_automacao": "70.0%",
        "taxa_sucesso_valor": 70.0,
        "casos_sucesso": 42,
        "total_casos": 60
    })
}

pub fn empty_dashboard_summary() -> Value {
    json!({
        "kpi_summary": null,
        "trend_history": [],
        "latest_report_urls": null
    })
}

pub fn dashboard_summary() -> Value {
    json!({
        "kpi_summary": kpi_summary(),
        "trend_history": [
            { "run_folder": "run_20251026", "filename": "analise_tendencia.html", "url": "/reports/run_20251026/analise_tendencia.html" }
        ],
        "latest_report_urls": {
            "summary": "/reports/run_20251026/resumo_geral.html",
            "action_plan": "/reports/run_20251026/planos_de_acao.html"
        },
        "quick_diagnosis_html": "<p>Stable week</p>",
        "latest_report_date_range": "01/10/2025 a 26/10/2025"
    })
}

pub fn upload_response() -> Value {
    json!({
        "success": true,
        "report_urls": {
            "summary": "/reports/run_20251027/resumo_geral.html",
            "trend": "/reports/run_20251027/analise_tendencia.html"
        },
        "kpi_summary": {
            "casos_atuacao": 0,
            "alertas_atuacao": 0,
            "casos_instabilidade": 2,
            "alertas_instabilidade": 7,
            "casos_sucesso_parcial": 0,
            "alertas_sucesso_parcial": 0,
            "taxa_sucesso_automacao": "95.0%",
            "taxa_sucesso_valor": 95.0,
            "casos_sucesso": 57,
            "total_casos": 60
        },
        "quick_diagnosis_html": "<p>Fewer open cases</p>",
        "date_range": "01/10/2025 a 27/10/2025"
    })
}

pub fn reports() -> Value {
    json!([
        {
            "id": "standard-2",
            "type": "standard",
            "timestamp": "2025-10-26T10:00:00",
            "original_filename": "alerts_october.csv",
            "date_range": "01/10/2025 a 26/10/2025",
            "url": "/reports/run_2/resumo_geral.html"
        },
        {
            "id": "standard-1",
            "type": "standard",
            "timestamp": "2025-10-25T11:00:00",
            "original_filename": "alerts_september.csv",
            "date_range": null,
            "url": "/reports/run_1/resumo_geral.html"
        },
        {
            "id": "comparative-1",
            "type": "comparative",
            "timestamp": "2025-10-26T10:05:00",
            "original_filename": "alerts_september.csv vs alerts_october.csv",
            "date_range": "",
            "url": "/reports/run_2/analise_tendencia.html"
        }
    ])
}
