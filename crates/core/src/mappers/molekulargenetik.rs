//! Molecular genetics forms of a patient: specimens, sequencing reports and MSI findings.
//!
//! Every `Molekulargenetik` row describes one specimen. Rows with a sequencing type also
//! yield a somatic NGS report whose simple variants come from the `Molekulargenuntersuchung`
//! subform (`ergebnis = P`). MSI findings come from the `MolekulargenMsi` subform.
//!
//! Field policy:
//! - specimen type and collection method degrade to absent
//! - an unknown sequencing type and an unknown MSI method are fatal
//! - the MSI interpretation degrades to absent

use super::{degrade, DataMapper, Discriminator};
use crate::catalogues::DataCatalogue;
use crate::coding::{
    self, MSI_INTERPRETATION, MSI_METHOD, NGS_REPORT_TYPE, SPECIMEN_COLLECTION_METHOD,
    SPECIMEN_TYPE,
};
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{
    Msi, NgsReportResults, Reference, SimpleVariant, SomaticNgsReport, SpecimenCollection,
    TumorSpecimen,
};
use std::rc::Rc;

/// Composite mapper over the molecular genetics form and its result subforms.
pub struct MolekulargenetikDataMapper {
    catalogue: Rc<DataCatalogue>,
    variants: MolekulargenuntersuchungDataMapper,
    msi: MolekulargenMsiDataMapper,
    diagnosis: Reference,
}

impl MolekulargenetikDataMapper {
    /// Specimens are attributed to `diagnosis`.
    pub fn new(
        catalogue: Rc<DataCatalogue>,
        variants: Rc<DataCatalogue>,
        msi: Rc<DataCatalogue>,
        diagnosis: Reference,
    ) -> Self {
        Self {
            catalogue,
            variants: MolekulargenuntersuchungDataMapper::new(variants),
            msi: MolekulargenMsiDataMapper::new(msi),
            diagnosis,
        }
    }

    pub fn get_specimens(&self, patient_id: i64) -> DataResult<Vec<TumorSpecimen>> {
        self.get_by_patient_id(patient_id)
    }

    /// Sequencing reports of the patient; forms without a sequencing type are skipped.
    pub fn get_ngs_reports(&self, patient_id: i64) -> DataResult<Vec<SomaticNgsReport>> {
        let mut reports = Vec::new();
        for row in self.catalogue.get_all_by_patient_id(patient_id)? {
            if let Some(report) = self.ngs_report(&row)? {
                reports.push(report);
            }
        }
        Ok(reports)
    }

    pub fn get_msi_findings(&self, patient_id: i64) -> DataResult<Vec<Msi>> {
        let mut findings = Vec::new();
        for row in self.catalogue.get_all_by_patient_id(patient_id)? {
            findings.extend(self.msi.get_by_parent_id(row.get_id()?)?);
        }
        Ok(findings)
    }

    fn ngs_report(&self, row: &ResultSet) -> DataResult<Option<SomaticNgsReport>> {
        let Some(raw_type) = row.get_string("artdersequenzierung")? else {
            return Ok(None);
        };
        let id = row.get_id()?;

        Ok(Some(SomaticNgsReport {
            id: id.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            specimen: Reference::specimen(id.to_string()),
            issued_on: row.get_date("datum")?,
            type_: NGS_REPORT_TYPE.coding(&raw_type)?,
            results: NgsReportResults {
                simple_variants: self.variants.get_by_parent_id(id)?,
            },
        }))
    }
}

impl DataMapper for MolekulargenetikDataMapper {
    type Output = TumorSpecimen;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<TumorSpecimen> {
        let type_ = degrade(
            "materialtyp",
            row.get_string("materialtyp")?
                .map(|raw| SPECIMEN_TYPE.coding(&raw))
                .transpose(),
        )?;
        let method = degrade(
            "entnahmemethode",
            row.get_string("entnahmemethode")?
                .map(|raw| SPECIMEN_COLLECTION_METHOD.coding(&raw))
                .transpose(),
        )?;
        let date = row.get_date("entnahmedatum")?;

        let collection = (date.is_some() || method.is_some())
            .then_some(SpecimenCollection { date, method });

        Ok(TumorSpecimen {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            diagnosis: self.diagnosis.clone(),
            type_,
            collection,
        })
    }
}

/// Maps simple variants (`ergebnis = P`) of a molecular genetics form.
pub struct MolekulargenuntersuchungDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl MolekulargenuntersuchungDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for MolekulargenuntersuchungDataMapper {
    type Output = SimpleVariant;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn discriminator(&self) -> Option<Discriminator> {
        Some(Discriminator {
            column: "ergebnis",
            value: "P",
        })
    }

    fn map(&self, row: &ResultSet) -> DataResult<SimpleVariant> {
        Ok(SimpleVariant {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            gene: row.get_string("untersucht")?.map(|symbol| coding::gene(&symbol)),
            dna_change: row.get_string("cdnaaenderung")?,
            protein_change: row.get_string("proteinaenderung")?,
            allelic_frequency: row.get_double("allelfrequenz")?,
        })
    }
}

pub struct MolekulargenMsiDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl MolekulargenMsiDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for MolekulargenMsiDataMapper {
    type Output = Msi;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<Msi> {
        let interpretation = degrade(
            "interpretation",
            row.get_string("interpretation")?
                .map(|raw| MSI_INTERPRETATION.coding(&raw))
                .transpose(),
        )?;

        Ok(Msi {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            specimen: Reference::specimen(row.get_parent_id()?.to_string()),
            method: MSI_METHOD.coding(&row.required_string("methode")?)?,
            value: row.get_double("wert")?,
            interpretation,
        })
    }
}
