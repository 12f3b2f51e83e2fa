// Built-in constant table and problem sequence for PEM catalyst demand.
// Values are order-of-magnitude literature figures.

use crate::dim::{parse_quantity, parse_unit, DimResult, Expression};
use crate::notebook::models::{Constant, Notebook, Problem};

pub const BUILTIN_TITLE: &str = "Precious-metal demand of PEM electrolysis";

struct ConstantDef {
    name: &'static str,
    value: &'static str,
    citation: &'static str,
    note: Option<&'static str>,
}

struct ProblemDef {
    name: &'static str,
    title: &'static str,
    expression: &'static str,
    unit: &'static str,
}

const CONSTANTS: &[ConstantDef] = &[
    ConstantDef {
        name: "platinum_production",
        value: "2e5 kg/yr",
        citation: "USGS Mineral Commodity Summaries, Platinum-Group Metals",
        note: Some("world mine production, rounded"),
    },
    ConstantDef {
        name: "iridium_production",
        value: "1e4 kg/yr",
        citation: "Minke et al., Int. J. Hydrogen Energy (2021)",
        note: Some("by-product of platinum mining, rounded up"),
    },
    ConstantDef {
        name: "platinum_loading",
        value: "2 mg/cm^2",
        citation: "Carmo et al., Int. J. Hydrogen Energy 38 (2013) 4901",
        note: Some("PEM electrolyzer cathode"),
    },
    ConstantDef {
        name: "iridium_loading",
        value: "2 mg/cm^2",
        citation: "Carmo et al., Int. J. Hydrogen Energy 38 (2013) 4901",
        note: Some("PEM electrolyzer anode"),
    },
    ConstantDef {
        name: "current_density",
        value: "2 A/cm^2",
        citation: "Carmo et al., Int. J. Hydrogen Energy 38 (2013) 4901",
        note: Some("upper end of commercial operation"),
    },
    ConstantDef {
        name: "thermodynamic_potential",
        value: "1.23 V",
        citation: "Standard reversible cell potential of water splitting, 25 °C",
        note: None,
    },
    ConstantDef {
        name: "installed_capacity_world_2030",
        value: "1500 GW",
        citation: "Scenario projection of world installed capacity in 2030",
        note: None,
    },
];

const PROBLEMS: &[ProblemDef] = &[
    ProblemDef {
        name: "max_deployment_rate_pem_cathode",
        title: "PEM capacity per year if all mined platinum went to cathodes",
        expression: "platinum_production / platinum_loading * current_density * thermodynamic_potential",
        unit: "GW/yr",
    },
    ProblemDef {
        name: "years_to_world_capacity_2030_cathode",
        title: "Years of platinum production needed for the 2030 capacity",
        expression: "installed_capacity_world_2030 / max_deployment_rate_pem_cathode",
        unit: "yr",
    },
    ProblemDef {
        name: "max_deployment_rate_pem_anode",
        title: "PEM capacity per year if all mined iridium went to anodes",
        expression: "iridium_production / iridium_loading * current_density * thermodynamic_potential",
        unit: "GW/yr",
    },
    ProblemDef {
        name: "years_to_world_capacity_2030_anode",
        title: "Years of iridium production needed for the 2030 capacity",
        expression: "installed_capacity_world_2030 / max_deployment_rate_pem_anode",
        unit: "yr",
    },
];

/// The built-in notebook: constant table plus problem sequence
pub fn builtin_notebook() -> DimResult<Notebook> {
    let constants = CONSTANTS
        .iter()
        .map(|def| {
            Ok(Constant {
                name: def.name.to_string(),
                quantity: parse_quantity(def.value)?,
                citation: Some(def.citation.to_string()),
                note: def.note.map(str::to_string),
            })
        })
        .collect::<DimResult<Vec<_>>>()?;

    let problems = PROBLEMS
        .iter()
        .map(|def| {
            Ok(Problem {
                name: def.name.to_string(),
                title: Some(def.title.to_string()),
                expression: Expression::parse(def.expression)?,
                unit: Some(parse_unit(def.unit)?),
            })
        })
        .collect::<DimResult<Vec<_>>>()?;

    Ok(Notebook {
        title: BUILTIN_TITLE.to_string(),
        constants,
        problems,
    })
}
