//! Catalogs of valid answer values.
//!
//! Each catalog pairs a stored code (`as_str`) with a human-readable label.
//! Catalog data feeds the built-in schema definitions' item lists and,
//! through them, the document translation table.

use crate::model::Item;

/// A static enumeration of answer values.
pub trait Catalog: Copy + 'static {
    const ALL: &'static [Self];

    /// The code stored in documents.
    fn as_str(&self) -> &'static str;

    /// The label shown to readers.
    fn label(&self) -> &'static str;
}

/// Build schema items from a catalog, in declaration order.
pub fn items<C: Catalog>() -> Vec<Item> {
    C::ALL.iter().map(|c| Item::new(c.as_str(), c.label())).collect()
}

/// Innovation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    MedicalDevice,
    InVitroDiagnostic,
    Pharmaceutical,
    Digital,
    Ai,
    Education,
    Ppe,
    ModelsCare,
    EstatesFacilities,
    TravelTransport,
    FoodNutrition,
    DataMonitoring,
    Other,
}

impl Catalog for Category {
    const ALL: &'static [Self] = &[
        Self::MedicalDevice,
        Self::InVitroDiagnostic,
        Self::Pharmaceutical,
        Self::Digital,
        Self::Ai,
        Self::Education,
        Self::Ppe,
        Self::ModelsCare,
        Self::EstatesFacilities,
        Self::TravelTransport,
        Self::FoodNutrition,
        Self::DataMonitoring,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::MedicalDevice => "MEDICAL_DEVICE",
            Self::InVitroDiagnostic => "IN_VITRO_DIAGNOSTIC",
            Self::Pharmaceutical => "PHARMACEUTICAL",
            Self::Digital => "DIGITAL",
            Self::Ai => "AI",
            Self::Education => "EDUCATION",
            Self::Ppe => "PPE",
            Self::ModelsCare => "MODELS_CARE",
            Self::EstatesFacilities => "ESTATES_FACILITIES",
            Self::TravelTransport => "TRAVEL_TRANSPORT",
            Self::FoodNutrition => "FOOD_NUTRITION",
            Self::DataMonitoring => "DATA_MONITORING",
            Self::Other => "OTHER",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::MedicalDevice => "Medical device",
            Self::InVitroDiagnostic => "In vitro diagnostic",
            Self::Pharmaceutical => "Pharmaceutical",
            Self::Digital => "Digital (including apps, platforms, software)",
            Self::Ai => "Artificial intelligence (AI)",
            Self::Education => "Education or training of workforce",
            Self::Ppe => "Personal protective equipment (PPE)",
            Self::ModelsCare => "Models of care and clinical pathways",
            Self::EstatesFacilities => "Estates and facilities",
            Self::TravelTransport => "Travel and transport",
            Self::FoodNutrition => "Food and nutrition",
            Self::DataMonitoring => "Data monitoring and insights",
            Self::Other => "Other",
        }
    }
}

/// Care settings an innovation is relevant to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareSetting {
    Academia,
    AcuteTrustsInpatient,
    AcuteTrustsOutpatient,
    Ambulance,
    CareHomes,
    EndLifeCare,
    Ics,
    Industry,
    LocalAuthoritySocialCare,
    Pharmacy,
    PrimaryCare,
    SocialCare,
    UrgentAndEmergency,
    Other,
}

impl Catalog for CareSetting {
    const ALL: &'static [Self] = &[
        Self::Academia,
        Self::AcuteTrustsInpatient,
        Self::AcuteTrustsOutpatient,
        Self::Ambulance,
        Self::CareHomes,
        Self::EndLifeCare,
        Self::Ics,
        Self::Industry,
        Self::LocalAuthoritySocialCare,
        Self::Pharmacy,
        Self::PrimaryCare,
        Self::SocialCare,
        Self::UrgentAndEmergency,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Academia => "ACADEMIA",
            Self::AcuteTrustsInpatient => "ACUTE_TRUSTS_INPATIENT",
            Self::AcuteTrustsOutpatient => "ACUTE_TRUSTS_OUTPATIENT",
            Self::Ambulance => "AMBULANCE",
            Self::CareHomes => "CARE_HOMES_CARE_SETTING",
            Self::EndLifeCare => "END_LIFE_CARE",
            Self::Ics => "ICS",
            Self::Industry => "INDUSTRY",
            Self::LocalAuthoritySocialCare => "LOCAL_AUTHORITY_SOCIAL_CARE",
            Self::Pharmacy => "PHARMACY",
            Self::PrimaryCare => "PRIMARY_CARE",
            Self::SocialCare => "SOCIAL_CARE",
            Self::UrgentAndEmergency => "URGENT_AND_EMERGENCY",
            Self::Other => "OTHER",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Academia => "Academia",
            Self::AcuteTrustsInpatient => "Acute trust (inpatient)",
            Self::AcuteTrustsOutpatient => "Acute trust (outpatient)",
            Self::Ambulance => "Ambulance",
            Self::CareHomes => "Care homes or carers",
            Self::EndLifeCare => "End of life care (EOLC)",
            Self::Ics => "Integrated care system (ICS)",
            Self::Industry => "Industry",
            Self::LocalAuthoritySocialCare => "Local authority care services",
            Self::Pharmacy => "Pharmacies",
            Self::PrimaryCare => "Primary care",
            Self::SocialCare => "Social care",
            Self::UrgentAndEmergency => "Urgent and emergency",
            Self::Other => "Other",
        }
    }
}

/// Main purpose of an innovation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainPurpose {
    PreventCondition,
    PredictCondition,
    DiagnoseCondition,
    MonitorCondition,
    ProvideTreatment,
    ManageCondition,
    EnablingCare,
}

impl Catalog for MainPurpose {
    const ALL: &'static [Self] = &[
        Self::PreventCondition,
        Self::PredictCondition,
        Self::DiagnoseCondition,
        Self::MonitorCondition,
        Self::ProvideTreatment,
        Self::ManageCondition,
        Self::EnablingCare,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::PreventCondition => "PREVENT_CONDITION",
            Self::PredictCondition => "PREDICT_CONDITION",
            Self::DiagnoseCondition => "DIAGNOSE_CONDITION",
            Self::MonitorCondition => "MONITOR_CONDITION",
            Self::ProvideTreatment => "PROVIDE_TREATMENT",
            Self::ManageCondition => "MANAGE_CONDITION",
            Self::EnablingCare => "ENABLING_CARE",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::PreventCondition => "Preventing a condition occurring or worsening",
            Self::PredictCondition => "Predicting the occurrence of a condition",
            Self::DiagnoseCondition => "Diagnosing a condition",
            Self::MonitorCondition => "Monitoring a condition, treatment or therapy",
            Self::ProvideTreatment => "Providing treatment or therapy",
            Self::ManageCondition => "Managing a condition",
            Self::EnablingCare => "Enabling care, services or communication",
        }
    }
}

/// Certifications and standards an innovation may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardType {
    CeUkcaNonMedical,
    CeUkcaClassI,
    CeUkcaClassIiA,
    CeUkcaClassIiB,
    CeUkcaClassIii,
    IvdGeneral,
    IvdSelfTest,
    Cqc,
    Dtac,
    Other,
}

impl Catalog for StandardType {
    const ALL: &'static [Self] = &[
        Self::CeUkcaNonMedical,
        Self::CeUkcaClassI,
        Self::CeUkcaClassIiA,
        Self::CeUkcaClassIiB,
        Self::CeUkcaClassIii,
        Self::IvdGeneral,
        Self::IvdSelfTest,
        Self::Cqc,
        Self::Dtac,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::CeUkcaNonMedical => "CE_UKCA_NON_MEDICAL",
            Self::CeUkcaClassI => "CE_UKCA_CLASS_I",
            Self::CeUkcaClassIiA => "CE_UKCA_CLASS_II_A",
            Self::CeUkcaClassIiB => "CE_UKCA_CLASS_II_B",
            Self::CeUkcaClassIii => "CE_UKCA_CLASS_III",
            Self::IvdGeneral => "IVD_GENERAL",
            Self::IvdSelfTest => "IVD_SELF_TEST",
            Self::Cqc => "CQC",
            Self::Dtac => "DTAC",
            Self::Other => "OTHER",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::CeUkcaNonMedical => "Non-medical device",
            Self::CeUkcaClassI => "Class I medical device",
            Self::CeUkcaClassIiA => "Class IIa medical device",
            Self::CeUkcaClassIiB => "Class IIb medical device",
            Self::CeUkcaClassIii => "Class III medical device",
            Self::IvdGeneral => "IVD general",
            Self::IvdSelfTest => "IVD self-test",
            Self::Cqc => "Care Quality Commission (CQC) registration",
            Self::Dtac => "Digital Technology Assessment Criteria (DTAC)",
            Self::Other => "Other",
        }
    }
}

/// Whether a given standard has been met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardMet {
    Yes,
    InProgress,
    NotYet,
}

impl Catalog for StandardMet {
    const ALL: &'static [Self] = &[Self::Yes, Self::InProgress, Self::NotYet];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::InProgress => "IN_PROGRESS",
            Self::NotYet => "NOT_YET",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::InProgress => "I am actively working towards it",
            Self::NotYet => "Not yet",
        }
    }
}

/// Kinds of evidence an innovator can attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceSubmitType {
    ClinicalOrCare,
    CostImpactOrEconomic,
    OtherEffectiveness,
    PreClinical,
    RealWorld,
}

impl Catalog for EvidenceSubmitType {
    const ALL: &'static [Self] = &[
        Self::ClinicalOrCare,
        Self::CostImpactOrEconomic,
        Self::OtherEffectiveness,
        Self::PreClinical,
        Self::RealWorld,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::ClinicalOrCare => "CLINICAL_OR_CARE",
            Self::CostImpactOrEconomic => "COST_IMPACT_OR_ECONOMIC",
            Self::OtherEffectiveness => "OTHER_EFFECTIVENESS",
            Self::PreClinical => "PRE_CLINICAL",
            Self::RealWorld => "REAL_WORLD",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::ClinicalOrCare => "Evidence of clinical or care outcomes",
            Self::CostImpactOrEconomic => "Evidence of cost impact, efficiency gains and/or economic modelling",
            Self::OtherEffectiveness => "Other evidence of effectiveness",
            Self::PreClinical => "Pre-clinical evidence",
            Self::RealWorld => "Real world evidence",
        }
    }
}

/// Study designs behind a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceType {
    DataPublished,
    NonRandomisedComparativeData,
    NonRandomisedNonComparativeData,
    Conference,
    RandomisedControlledTrial,
    UnpublishedData,
    Other,
}

impl Catalog for EvidenceType {
    const ALL: &'static [Self] = &[
        Self::DataPublished,
        Self::NonRandomisedComparativeData,
        Self::NonRandomisedNonComparativeData,
        Self::Conference,
        Self::RandomisedControlledTrial,
        Self::UnpublishedData,
        Self::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::DataPublished => "DATA_PUBLISHED",
            Self::NonRandomisedComparativeData => "NON_RANDOMISED_COMPARATIVE_DATA",
            Self::NonRandomisedNonComparativeData => "NON_RANDOMISED_NON_COMPARATIVE_DATA",
            Self::Conference => "CONFERENCE",
            Self::RandomisedControlledTrial => "RANDOMISED_CONTROLLED_TRIAL",
            Self::UnpublishedData => "UNPUBLISHED_DATA",
            Self::Other => "OTHER",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::DataPublished => "Data published",
            Self::NonRandomisedComparativeData => "Non-randomised comparative data",
            Self::NonRandomisedNonComparativeData => "Non-randomised non-comparative data",
            Self::Conference => "Conference presentation or poster",
            Self::RandomisedControlledTrial => "Randomised controlled trial",
            Self::UnpublishedData => "Unpublished data",
            Self::Other => "Other",
        }
    }
}

/// Key health inequality areas an innovation may impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHealthInequality {
    Maternity,
    SevereMentalIllness,
    ChronicRespiratoryDisease,
    EarlyCancerDiagnosis,
    HypertensionCaseFinding,
    None,
}

impl Catalog for KeyHealthInequality {
    const ALL: &'static [Self] = &[
        Self::Maternity,
        Self::SevereMentalIllness,
        Self::ChronicRespiratoryDisease,
        Self::EarlyCancerDiagnosis,
        Self::HypertensionCaseFinding,
        Self::None,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Maternity => "MATERNITY",
            Self::SevereMentalIllness => "SEVERE_MENTAL_ILLNESS",
            Self::ChronicRespiratoryDisease => "CHRONIC_RESPIRATORY_DISEASE",
            Self::EarlyCancerDiagnosis => "EARLY_CANCER_DIAGNOSIS",
            Self::HypertensionCaseFinding => "HYPERTENSION_CASE_FINDING",
            Self::None => "NONE",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Maternity => "Maternity",
            Self::SevereMentalIllness => "Severe mental illness",
            Self::ChronicRespiratoryDisease => "Chronic respiratory disease",
            Self::EarlyCancerDiagnosis => "Early cancer diagnosis",
            Self::HypertensionCaseFinding => "Hypertension case finding and optimal management and lipid optimal management",
            Self::None => "None of those listed",
        }
    }
}

/// Carbon reduction plan status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarbonReductionPlan {
    Yes,
    WorkingOn,
    No,
}

impl Catalog for CarbonReductionPlan {
    const ALL: &'static [Self] = &[Self::Yes, Self::WorkingOn, Self::No];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::WorkingOn => "WORKING_ON",
            Self::No => "NO",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes, I have one",
            Self::WorkingOn => "I am working on one",
            Self::No => "No, I do not have one",
        }
    }
}

/// Plain yes/no answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl Catalog for YesNo {
    const ALL: &'static [Self] = &[Self::Yes, Self::No];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// Yes/no/not-sure answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNoNotSure {
    Yes,
    No,
    NotSure,
}

impl Catalog for YesNoNotSure {
    const ALL: &'static [Self] = &[Self::Yes, Self::No, Self::NotSure];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::NotSure => "NOT_SURE",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::NotSure => "I am not sure",
        }
    }
}

/// Accelerated Access Collaborative programmes. Codes equal labels, so these
/// values never need translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AacProgramme {
    HealthInnovationNetwork,
    AiAward,
    ClinicalEntrepreneur,
    EarlyAccessMedicines,
    InnovationTechnologyPayment,
    NhsInnovationAccelerator,
    NhsInsightsPrioritisation,
    PathwayTransformationFund,
    RapidUptakeProducts,
    SmallBusinessResearchInitiative,
    TestBeds,
    None,
}

impl Catalog for AacProgramme {
    const ALL: &'static [Self] = &[
        Self::HealthInnovationNetwork,
        Self::AiAward,
        Self::ClinicalEntrepreneur,
        Self::EarlyAccessMedicines,
        Self::InnovationTechnologyPayment,
        Self::NhsInnovationAccelerator,
        Self::NhsInsightsPrioritisation,
        Self::PathwayTransformationFund,
        Self::RapidUptakeProducts,
        Self::SmallBusinessResearchInitiative,
        Self::TestBeds,
        Self::None,
    ];

    fn as_str(&self) -> &'static str {
        self.label()
    }

    fn label(&self) -> &'static str {
        match self {
            Self::HealthInnovationNetwork => "Health Innovation Network",
            Self::AiAward => "Artificial Intelligence in Health and Care Award",
            Self::ClinicalEntrepreneur => "Clinical Entrepreneur Programme",
            Self::EarlyAccessMedicines => "Early Access to Medicines Scheme",
            Self::InnovationTechnologyPayment => "Innovation and Technology Payment Programme",
            Self::NhsInnovationAccelerator => "NHS Innovation Accelerator",
            Self::NhsInsightsPrioritisation => "NHS Insights Prioritisation Programme",
            Self::PathwayTransformationFund => "Pathway Transformation Fund",
            Self::RapidUptakeProducts => "Rapid Uptake Products Programme",
            Self::SmallBusinessResearchInitiative => "Small Business Research Initiative for Healthcare",
            Self::TestBeds => "Test beds",
            Self::None => "None",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_per_catalog() {
        fn assert_unique<C: Catalog>() {
            let mut seen = std::collections::BTreeSet::new();
            for c in C::ALL {
                assert!(seen.insert(c.as_str()), "duplicate code {}", c.as_str());
            }
        }
        assert_unique::<Category>();
        assert_unique::<CareSetting>();
        assert_unique::<MainPurpose>();
        assert_unique::<StandardType>();
        assert_unique::<EvidenceSubmitType>();
        assert_unique::<EvidenceType>();
        assert_unique::<KeyHealthInequality>();
        assert_unique::<AacProgramme>();
    }

    #[test]
    fn items_preserve_order_and_labels() {
        let its = items::<Category>();
        assert_eq!(its[0].id, "MEDICAL_DEVICE");
        assert_eq!(its[1].label, "In vitro diagnostic");
        assert_eq!(its.len(), Category::ALL.len());
    }

    #[test]
    fn aac_codes_equal_labels() {
        for p in AacProgramme::ALL {
            assert_eq!(p.as_str(), p.label());
        }
    }
}
