//! HTML rendering: minijinja templates plus the view models they consume.

use axum::response::Html;
use minijinja::Environment;
use serde::Serialize;
use smartremedy_client::Theme;
use smartremedy_common::KpiSummary;

use crate::error::WebResult;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("history.html", include_str!("../templates/history.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("feedback.html", include_str!("../templates/feedback.html")),
];

/// Compiled page templates. `.html` names are auto-escaped.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> WebResult<Html<String>> {
        let template = self.env.get_template(name)?;
        Ok(Html(template.render(ctx)?))
    }
}

/// Shared by every page: sidebar, theme and live-reload target.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: String,
    /// GET route the page reloads to when a session event arrives.
    pub path: &'static str,
    pub authenticated: bool,
    pub theme: Theme,
    pub body_class: &'static str,
    /// "New analysis" only makes sense while previews are on screen.
    pub show_new_analysis: bool,
    pub docs_url: String,
    pub apidocs_url: String,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// KPI cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Danger,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub title: &'static str,
    pub value: String,
    pub sub_value: Option<String>,
    /// Only labelled sub-values are coloured.
    pub sub_label: Option<&'static str>,
    pub tone: Tone,
}

/// State of the KPI section at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum KpiPanel {
    Failed { message: String },
    Empty,
    Populated { cards: Vec<KpiCard> },
}

impl KpiPanel {
    pub fn from_summary(kpi: Option<&KpiSummary>) -> Self {
        match kpi {
            Some(kpi) => KpiPanel::Populated { cards: kpi_cards(kpi) },
            None => KpiPanel::Empty,
        }
    }
}

fn alerts(count: u64, shown: bool) -> (Option<String>, Option<&'static str>) {
    if shown && count > 0 {
        (Some(count.to_string()), Some("Alerts"))
    } else {
        (None, None)
    }
}

fn tone_when_open(cases: u64, open: Tone) -> Tone {
    if cases > 0 { open } else { Tone::Success }
}

pub fn kpi_cards(kpi: &KpiSummary) -> Vec<KpiCard> {
    let (atuacao_sub, atuacao_label) = alerts(kpi.alertas_atuacao, kpi.casos_atuacao > 0);
    let (instab_sub, instab_label) = alerts(kpi.alertas_instabilidade, true);
    let (parcial_sub, parcial_label) = alerts(kpi.alertas_sucesso_parcial, true);

    let success_tone = if kpi.taxa_sucesso_valor < 50.0 {
        Tone::Danger
    } else if kpi.taxa_sucesso_valor < 70.0 {
        Tone::Warning
    } else {
        Tone::Success
    };

    vec![
        KpiCard {
            title: "Cases without remediation",
            value: kpi.casos_atuacao.to_string(),
            sub_value: atuacao_sub,
            sub_label: atuacao_label,
            tone: tone_when_open(kpi.casos_atuacao, Tone::Danger),
        },
        KpiCard {
            title: "Frequently remediated cases",
            value: kpi.casos_instabilidade.to_string(),
            sub_value: instab_sub,
            sub_label: instab_label,
            tone: tone_when_open(kpi.casos_instabilidade, Tone::Warning),
        },
        KpiCard {
            title: "Attention points",
            value: kpi.casos_sucesso_parcial.to_string(),
            sub_value: parcial_sub,
            sub_label: parcial_label,
            tone: tone_when_open(kpi.casos_sucesso_parcial, Tone::Warning),
        },
        KpiCard {
            title: "Automation success",
            value: kpi.taxa_sucesso_automacao.clone(),
            sub_value: Some(format!("{} of {} cases", kpi.casos_sucesso, kpi.total_casos)),
            sub_label: None,
            tone: success_tone,
        },
    ]
}
