//! Innovation Record definition, version 202209.
//!
//! First published revision, frozen. Superseded by 202304; kept so that
//! stored documents remain interpretable and migratable.

use super::*;
use crate::catalog::{CareSetting, MainPurpose, YesNo};

pub(super) const ALIASES: &[(&str, &str)] = &[
    ("INNOVATION_DESCRIPTION", "INN"),
    ("VALUE_PROPOSITION", "VAP"),
    ("UNDERSTANDING_OF_NEEDS", "UON"),
    ("EVIDENCE_OF_EFFECTIVENESS", "EOE"),
    ("REGULATIONS_AND_STANDARDS", "RAS"),
    ("REVENUE_MODEL", "REV"),
    ("DEPLOYMENT", "DEP"),
];

/// Category options as published in 202209. `SERVICE_INTERVENTION` was
/// renamed to `MODELS_CARE` in 202304.
fn categories_202209() -> Vec<Item> {
    options(&[
        ("MEDICAL_DEVICE", "Medical device"),
        ("IN_VITRO_DIAGNOSTIC", "In vitro diagnostic"),
        ("PHARMACEUTICAL", "Pharmaceutical"),
        ("DIGITAL", "Digital (including apps, platforms, software)"),
        ("AI", "Artificial intelligence (AI)"),
        ("EDUCATION", "Education or training of workforce"),
        ("PPE", "Personal protective equipment (PPE)"),
        ("SERVICE_INTERVENTION", "Service or care intervention"),
        ("OTHER", "Other"),
    ])
}

pub(super) fn schema() -> IrSchema {
    IrSchema {
        sections: vec![
            section(
                "ABOUT_YOUR_PRODUCT_OR_SERVICE",
                "About your product or service",
                vec![innovation_description(), value_proposition(), understanding_of_needs()],
            ),
            section(
                "EVIDENCE_AND_REGULATION",
                "Evidence and regulation",
                vec![evidence_of_effectiveness(), regulations_and_standards()],
            ),
            section(
                "COMMERCIALISATION_AND_DEPLOYMENT",
                "Commercialisation and deployment",
                vec![revenue_model(), deployment()],
            ),
        ],
    }
}

fn innovation_description() -> SubSection {
    subsection_with_files(
        "INNOVATION_DESCRIPTION",
        "Description of innovation",
        vec![
            step(vec![
                required(with_max_length(text("name", "What is the name of your innovation?"), 100)),
                required(textarea("description", "Provide a short description of your innovation", 500)),
            ]),
            step(vec![required(radio_catalog::<YesNo>(
                "hasFinalProduct",
                "Do you have a working product, service or prototype?",
            ))]),
            step(vec![
                conditional_on(
                    required(checkbox(
                        "categories",
                        "Select all the categories that can be used to describe your innovation",
                        categories_202209(),
                    )),
                    "OTHER",
                    with_max_length(text("otherCategoryDescription", "Other category"), 100),
                ),
                radio("mainCategory", "Select a primary category to describe your innovation", categories_202209()),
            ]),
            step(vec![conditional_on(
                required(checkbox_catalog::<CareSetting>(
                    "careSettings",
                    "In which care settings is your innovation relevant?",
                )),
                "OTHER",
                with_max_length(text("otherCareSetting", "Other care setting"), 100),
            )]),
            step(vec![radio_catalog::<MainPurpose>(
                "mainPurpose",
                "What is the main purpose of your innovation?",
            )]),
        ],
    )
}

fn value_proposition() -> SubSection {
    subsection(
        "VALUE_PROPOSITION",
        "Value proposition",
        vec![
            step(vec![required(textarea(
                "problemsTackled",
                "What problem is your innovation trying to solve?",
                500,
            ))]),
            step(vec![textarea(
                "intervention",
                "Explain how your innovation works",
                500,
            )]),
            step(vec![textarea(
                "interventionImpact",
                "Describe the impact of your intervention",
                500,
            )]),
        ],
    )
}

fn understanding_of_needs() -> SubSection {
    subsection(
        "UNDERSTANDING_OF_NEEDS",
        "Detailed understanding of needs and benefits",
        vec![
            step(vec![radio_catalog::<YesNo>(
                "impactPatients",
                "Does your innovation impact patients or citizens?",
            )]),
            step(vec![radio_catalog::<YesNo>(
                "impactClinicians",
                "Does your innovation impact clinicians or care givers?",
            )]),
        ],
    )
}

fn evidence_of_effectiveness() -> SubSection {
    subsection_with_files(
        "EVIDENCE_OF_EFFECTIVENESS",
        "Evidence of impact and benefit",
        vec![
            step(vec![required(radio_catalog::<YesNo>(
                "hasEvidence",
                "Do you have evidence to support the efficacy of your innovation?",
            ))]),
            step_if(
                "hasEvidence",
                &["YES"],
                vec![textarea(
                    "evidenceDescription",
                    "Describe the evidence you have",
                    500,
                )],
            ),
        ],
    )
}

fn regulations_and_standards() -> SubSection {
    subsection_with_files(
        "REGULATIONS_AND_STANDARDS",
        "Regulatory approvals, standards and certifications",
        vec![step(vec![required(radio(
            "hasRegulationKnowledge",
            "Do you know which regulations, standards and certifications apply to your innovation?",
            options(&[
                ("YES_ALL", "Yes, I know all of them"),
                ("YES_SOME", "Yes, I know some of them"),
                ("NO", "No"),
                ("NOT_RELEVANT", "Not relevant"),
            ]),
        ))])],
    )
}

fn revenue_model() -> SubSection {
    subsection(
        "REVENUE_MODEL",
        "Revenue model",
        vec![
            step(vec![required(radio_catalog::<YesNo>(
                "hasRevenueModel",
                "Do you have a model for generating revenue from your innovation?",
            ))]),
            step_if(
                "hasRevenueModel",
                &["YES"],
                vec![textarea("payingOrganisations", "Which organisations do you expect to pay for your innovation?", 500)],
            ),
        ],
    )
}

fn deployment() -> SubSection {
    subsection_with_files(
        "DEPLOYMENT",
        "Deployment",
        vec![
            step(vec![
                required(radio_catalog::<YesNo>("hasDeployPlan", "Do you have a deployment plan?")),
                radio_catalog::<YesNo>("isDeployed", "Is your innovation deployed in the NHS or social care?"),
            ]),
            step(vec![textarea(
                "organisationDeploymentAffect",
                "Does your innovation affect how the deploying organisation works?",
                500,
            )]),
        ],
    )
}
