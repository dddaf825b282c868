//! Innovation Record definition, version 202304.
//!
//! Current published revision. Changes from 202209:
//! - VALUE_PROPOSITION merged into UNDERSTANDING_OF_NEEDS
//! - `SERVICE_INTERVENTION` category renamed to `MODELS_CARE`
//! - `hasFinalProduct` retired
//! - health-inequality and carbon-reduction questions added

use super::*;
use crate::catalog::{
    AacProgramme, CarbonReductionPlan, CareSetting, Category, KeyHealthInequality, MainPurpose,
    StandardType, YesNo, YesNoNotSure,
};

pub(super) const ALIASES: &[(&str, &str)] = &[
    ("INNOVATION_DESCRIPTION", "INN"),
    ("UNDERSTANDING_OF_NEEDS", "UON"),
    ("EVIDENCE_OF_EFFECTIVENESS", "EOE"),
    ("MARKET_RESEARCH", "MKR"),
    ("CURRENT_CARE_PATHWAY", "CCP"),
    ("TESTING_WITH_USERS", "TWU"),
    ("REGULATIONS_AND_STANDARDS", "RAS"),
    ("INTELLECTUAL_PROPERTY", "INP"),
    ("REVENUE_MODEL", "REV"),
    ("COST_OF_INNOVATION", "COI"),
    ("DEPLOYMENT", "DEP"),
];

pub(super) fn schema() -> IrSchema {
    IrSchema {
        sections: vec![
            section(
                "ABOUT_YOUR_PRODUCT_OR_SERVICE",
                "About your product or service",
                vec![innovation_description(), understanding_of_needs(), evidence_of_effectiveness()],
            ),
            section(
                "MARKET_RESEARCH_AND_CARE_PATHWAY",
                "Market research and current care pathway",
                vec![market_research(), current_care_pathway()],
            ),
            section(
                "DEVELOPING_YOUR_PRODUCT",
                "Developing your product and adoption plans",
                vec![testing_with_users(), regulations_and_standards(), intellectual_property()],
            ),
            section(
                "COMMERCIALISATION_AND_DEPLOYMENT",
                "Commercialisation and deployment",
                vec![revenue_model(), cost_of_innovation(), deployment()],
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
            step(vec![conditional_on(
                required(radio(
                    "officeLocation",
                    "Where is your head office located?",
                    options(&[
                        ("ENGLAND", "England"),
                        ("SCOTLAND", "Scotland"),
                        ("WALES", "Wales"),
                        ("NORTHERN_IRELAND", "Northern Ireland"),
                        ("BASED_OUTSIDE_UK", "Based outside UK"),
                    ]),
                )),
                "BASED_OUTSIDE_UK",
                with_max_length(text("countryName", "Which country is your head office located in?"), 100),
            )]),
            step(vec![with_url_format(with_max_length(
                text("website", "Does your innovation have a website?"),
                100,
            ))]),
            step(vec![
                conditional_on(
                    required(checkbox_catalog::<Category>(
                        "categories",
                        "Select all the categories that can be used to describe your innovation",
                    )),
                    "OTHER",
                    with_max_length(text("otherCategoryDescription", "Other category"), 100),
                ),
                radio_catalog::<Category>("mainCategory", "Select a primary category to describe your innovation"),
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
            step(vec![required(textarea(
                "supportDescription",
                "What support are you seeking from the Innovation Service?",
                200,
            ))]),
            step(vec![checkbox_catalog::<AacProgramme>(
                "involvedAACProgrammes",
                "Are you involved with any Accelerated Access Collaborative programmes?",
            )]),
        ],
    )
}

fn understanding_of_needs() -> SubSection {
    subsection(
        "UNDERSTANDING_OF_NEEDS",
        "Detailed understanding of needs and benefits",
        vec![
            step(vec![required(textarea(
                "problemsTackled",
                "What problem is your innovation trying to solve?",
                500,
            ))]),
            step(vec![textarea(
                "howInnovationWork",
                "Explain how your innovation works",
                500,
            )]),
            step(vec![required(checkbox_catalog::<KeyHealthInequality>(
                "keyHealthInequalities",
                "Which key health inequalities does your innovation impact?",
            ))]),
            step(vec![radio_catalog::<YesNo>(
                "completedHealthInequalitiesImpactAssessment",
                "Have you completed a health inequalities impact assessment?",
            )]),
            step(vec![radio_catalog::<CarbonReductionPlan>(
                "carbonReductionPlan",
                "Do you have a carbon reduction plan?",
            )]),
        ],
    )
}

fn evidence_of_effectiveness() -> SubSection {
    subsection_with_files(
        "EVIDENCE_OF_EFFECTIVENESS",
        "Evidence of impact and benefit",
        vec![
            step(vec![required(radio_catalog::<YesNoNotSure>(
                "hasEvidence",
                "Do you have evidence to support the efficacy of your innovation?",
            ))]),
            step(vec![radio_catalog::<YesNo>(
                "currentlyCollectingEvidence",
                "Are you currently collecting evidence?",
            )]),
            step_if(
                "currentlyCollectingEvidence",
                &["YES"],
                vec![required(textarea(
                    "summaryOngoingEvidenceGathering",
                    "Summarise your ongoing or planned evidence gathering",
                    500,
                ))],
            ),
        ],
    )
}

fn market_research() -> SubSection {
    subsection(
        "MARKET_RESEARCH",
        "Market research",
        vec![
            step(vec![required(radio(
                "hasMarketResearch",
                "Have you conducted market research?",
                options(&[
                    ("YES", "Yes"),
                    ("IN_PROGRESS", "I am currently doing market research"),
                    ("NOT_YET", "Not yet"),
                ]),
            ))]),
            step_if(
                "hasMarketResearch",
                &["YES", "IN_PROGRESS"],
                vec![textarea("marketResearch", "Describe the market research you have done or are doing", 500)],
            ),
        ],
    )
}

fn current_care_pathway() -> SubSection {
    subsection(
        "CURRENT_CARE_PATHWAY",
        "Current care pathway",
        vec![
            step(vec![required(radio(
                "innovationPathwayKnowledge",
                "Does your innovation relate to a current NHS care pathway?",
                options(&[
                    ("PATHWAY_EXISTS_AND_CHANGED", "There is a pathway, and my innovation changes it"),
                    ("PATHWAY_EXISTS_AND_FITS", "There is a pathway, and my innovation fits in it"),
                    ("NO_PATHWAY", "There is no current care pathway"),
                    ("DONT_KNOW", "I do not know"),
                    ("NOT_PART_PATHWAY", "Does not form part of a care pathway"),
                ]),
            ))]),
            step_if(
                "innovationPathwayKnowledge",
                &["PATHWAY_EXISTS_AND_CHANGED", "PATHWAY_EXISTS_AND_FITS"],
                vec![textarea(
                    "potentialPathway",
                    "Describe the potential care pathway with your innovation in use",
                    500,
                )],
            ),
        ],
    )
}

fn testing_with_users() -> SubSection {
    subsection_with_files(
        "TESTING_WITH_USERS",
        "Testing with users",
        vec![
            step(vec![radio(
                "involvedUsersDesignProcess",
                "Have you involved users in the design process?",
                options(&[
                    ("YES", "Yes"),
                    ("IN_PROGRESS", "I am in the process of involving users"),
                    ("NOT_YET", "Not yet"),
                ]),
            )]),
            step(vec![required(radio(
                "testedWithIntendedUsers",
                "Have you tested your innovation with its intended users?",
                options(&[
                    ("YES", "Yes"),
                    ("IN_PROGRESS", "I am in the process of testing"),
                    ("NOT_YET", "Not yet"),
                ]),
            ))]),
            step_if(
                "testedWithIntendedUsers",
                &["YES", "IN_PROGRESS"],
                vec![conditional_on(
                    checkbox(
                        "intendedUserGroupsEngaged",
                        "Which user groups have you engaged?",
                        options(&[
                            ("CLINICAL_SOCIAL_CARE_WORKING_INSIDE_UK", "Clinical or social care professionals working in the UK"),
                            ("CLINICAL_SOCIAL_CARE_WORKING_OUTSIDE_UK", "Clinical or social care professionals working outside the UK"),
                            ("NON_CLINICAL_HEALTHCARE", "Non-clinical healthcare staff"),
                            ("PATIENTS", "Patients"),
                            ("SERVICE_USERS", "Service users"),
                            ("CARERS", "Carers"),
                            ("OTHER", "Other"),
                        ]),
                    ),
                    "OTHER",
                    with_max_length(text("otherIntendedUserGroupsEngaged", "Other user group"), 100),
                )],
            ),
            step(vec![fields_group(
                "userTests",
                "What kinds of testing have you done with users?",
                with_max_length(text("kind", "What kind of testing?"), 100),
                Some(textarea("feedback", "Describe the feedback from this testing", 500)),
                "Add another kind of testing",
            )]),
        ],
    )
}

fn regulations_and_standards() -> SubSection {
    subsection_with_files(
        "REGULATIONS_AND_STANDARDS",
        "Regulatory approvals, standards and certifications",
        vec![
            step(vec![required(radio(
                "hasRegulationKnowledge",
                "Do you know which regulations, standards and certifications apply to your innovation?",
                options(&[
                    ("YES_ALL", "Yes, I know all of them"),
                    ("YES_SOME", "Yes, I know some of them"),
                    ("NO", "No"),
                    ("NOT_RELEVANT", "Not relevant"),
                ]),
            ))]),
            step(vec![conditional_on(
                checkbox_catalog::<StandardType>(
                    "standardsType",
                    "Which regulations, standards and certifications apply to your innovation?",
                ),
                "OTHER",
                with_max_length(text("otherRegulationDescription", "Other standard"), 100),
            )]),
            step(vec![{
                let mut q = checkbox(
                    "standardsMet",
                    "Which of those standards have you already met?",
                    vec![Item::from_answer("standardsType")],
                );
                q.check_answer_label = Some("Standards met".to_string());
                q
            }]),
        ],
    )
}

fn intellectual_property() -> SubSection {
    subsection(
        "INTELLECTUAL_PROPERTY",
        "Intellectual property",
        vec![
            step(vec![required(radio(
                "hasPatents",
                "Do you have any patents for your innovation?",
                options(&[
                    ("HAS_AT_LEAST_ONE", "I have one or more patents"),
                    ("APPLIED_AT_LEAST_ONE", "I have applied for one or more patents"),
                    ("HAS_NONE", "I do not have any patents, but believe I have freedom to operate"),
                ]),
            ))]),
            step_if(
                "hasPatents",
                &["HAS_AT_LEAST_ONE", "APPLIED_AT_LEAST_ONE"],
                vec![with_max_length(text("patentNumbers", "What patent numbers apply?"), 100)],
            ),
            step(vec![conditional_on(
                radio_catalog::<YesNo>(
                    "hasOtherIntellectual",
                    "Do you have any other intellectual property for your innovation?",
                ),
                "YES",
                with_max_length(text("otherIntellectual", "Other intellectual property"), 100),
            )]),
        ],
    )
}

fn revenue_model() -> SubSection {
    subsection(
        "REVENUE_MODEL",
        "Revenue model",
        vec![
            step(vec![required(radio_catalog::<YesNoNotSure>(
                "hasRevenueModel",
                "Do you have a model for generating revenue from your innovation?",
            ))]),
            step_if(
                "hasRevenueModel",
                &["YES"],
                vec![conditional_on(
                    checkbox(
                        "revenues",
                        "What is the revenue model for your innovation?",
                        options(&[
                            ("ADVERTISING", "Advertising"),
                            ("DIRECT_PRODUCT_SALES", "Direct product sales"),
                            ("FEE_FOR_SERVICE", "Fee for service"),
                            ("LEASE", "Lease"),
                            ("SALES_OF_CONSUMABLES_OR_ACCESSORIES", "Sales of consumables or accessories"),
                            ("SUBSCRIPTION", "Subscription"),
                            ("OTHER", "Other"),
                        ]),
                    ),
                    "OTHER",
                    with_max_length(text("otherRevenueDescription", "Other revenue model"), 100),
                )],
            ),
            step_if(
                "hasRevenueModel",
                &["YES"],
                vec![
                    textarea("payingOrganisations", "Which organisations do you expect to pay for your innovation?", 500),
                    textarea("benefittingOrganisations", "Which organisations do you expect to benefit from your innovation?", 500),
                ],
            ),
        ],
    )
}

fn cost_of_innovation() -> SubSection {
    subsection(
        "COST_OF_INNOVATION",
        "Cost of your innovation",
        vec![
            step(vec![required(radio(
                "hasCostKnowledge",
                "Do you know the cost of your innovation?",
                options(&[
                    ("DETAILED_ESTIMATE", "Yes, I have a detailed estimate"),
                    ("ROUGH_IDEA", "Yes, I have a rough idea"),
                    ("NO", "No"),
                ]),
            ))]),
            step_if(
                "hasCostKnowledge",
                &["DETAILED_ESTIMATE", "ROUGH_IDEA"],
                vec![textarea("costDescription", "What is the cost of your innovation?", 500)],
            ),
            step(vec![
                radio(
                    "patientsRange",
                    "Roughly how many patients would be eligible for your innovation in the UK?",
                    options(&[
                        ("UP_10000", "Up to 10,000 per year"),
                        ("BETWEEN_10000_500000", "10,000 to half a million per year"),
                        ("MORE_THAN_500000", "More than half a million per year"),
                        ("NOT_SURE", "I am not sure"),
                        ("NOT_RELEVANT", "Not relevant to my innovation"),
                    ]),
                ),
                textarea("eligibilityCriteria", "What is the eligibility criteria for your innovation?", 500),
            ]),
        ],
    )
}

fn deployment() -> SubSection {
    let mut sub = subsection_with_files(
        "DEPLOYMENT",
        "Deployment",
        vec![
            step(vec![
                required(radio_catalog::<YesNo>("hasDeployPlan", "Do you have a deployment plan?")),
                radio_catalog::<YesNo>("isDeployed", "Is your innovation deployed in the NHS or social care?"),
            ]),
            step_if(
                "isDeployed",
                &["YES"],
                vec![fields_group(
                    "deploymentPlans",
                    "Where have you deployed your innovation?",
                    with_max_length(text("organisation", "Organisation and department"), 100),
                    Some(textarea("commercialBasis", "What was the commercial basis for this deployment?", 500)),
                    "Add another organisation",
                )],
            ),
            step(vec![textarea(
                "organisationDeploymentAffect",
                "Does your innovation affect how the deploying organisation works?",
                500,
            )]),
        ],
    );
    sub.calculated_fields.insert(
        "readyForDeployment".to_string(),
        vec![
            StepCondition {
                id: "hasDeployPlan".to_string(),
                options: vec!["YES".to_string()],
            },
            StepCondition {
                id: "isDeployed".to_string(),
                options: vec!["YES".to_string()],
            },
        ],
    );
    sub
}
