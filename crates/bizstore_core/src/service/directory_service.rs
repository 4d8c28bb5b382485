//! Business directory use-case service.
//!
//! # Responsibility
//! - Keep one entity store per business record type.
//! - Validate foreign keys on writes and traverse them on reads.
//!
//! # Invariants
//! - A child record is only stored when its parent id is present, and a parent
//!   is only removed once no child points at it.
//! - Stores are exposed read-only; every write goes through this service.
//! - Removing a company detaches its branches instead of leaving dangling ids.
//! - Branch opening hours are validated before insert.

use crate::config::StoreConfig;
use crate::model::business::{
    Address, Branch, Company, Country, Locality, ModelValidationError, Province,
};
use crate::model::entity::{Entity, EntityId, FieldValue};
use crate::repo::entity_store::{EntityRepository, InMemoryEntityStore, StoreError, StoreView};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors from business directory operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// Referenced parent record is not stored.
    MissingParent { kind: &'static str, id: EntityId },
    /// Target record of an explicit link operation is not stored.
    NotFound { kind: &'static str, id: EntityId },
    /// Record cannot be removed while children still reference it.
    HasDependents {
        kind: &'static str,
        id: EntityId,
        dependent_kind: &'static str,
        count: usize,
    },
    /// Record failed model validation.
    Validation(ModelValidationError),
    /// Store-level failure.
    Store(StoreError),
}

impl Display for DirectoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParent { kind, id } => write!(f, "parent {kind} not found: {id}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::HasDependents {
                kind,
                id,
                dependent_kind,
                count,
            } => write!(
                f,
                "{kind} {id} is still referenced by {count} {dependent_kind} record(s)"
            ),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DirectoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingParent { .. } => None,
            Self::NotFound { .. } => None,
            Self::HasDependents { .. } => None,
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for DirectoryError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ModelValidationError> for DirectoryError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Arena of business records linked by id.
#[derive(Debug)]
pub struct BusinessDirectory {
    countries: InMemoryEntityStore<Country>,
    provinces: InMemoryEntityStore<Province>,
    localities: InMemoryEntityStore<Locality>,
    addresses: InMemoryEntityStore<Address>,
    branches: InMemoryEntityStore<Branch>,
    companies: InMemoryEntityStore<Company>,
}

impl BusinessDirectory {
    pub fn try_new() -> DirectoryResult<Self> {
        Self::try_with_config(StoreConfig::default())
    }

    pub fn try_with_config(config: StoreConfig) -> DirectoryResult<Self> {
        Ok(Self {
            countries: InMemoryEntityStore::try_with_config(config)?,
            provinces: InMemoryEntityStore::try_with_config(config)?,
            localities: InMemoryEntityStore::try_with_config(config)?,
            addresses: InMemoryEntityStore::try_with_config(config)?,
            branches: InMemoryEntityStore::try_with_config(config)?,
            companies: InMemoryEntityStore::try_with_config(config)?,
        })
    }

    pub fn countries(&self) -> StoreView<'_, Country> {
        self.countries.view()
    }

    pub fn provinces(&self) -> StoreView<'_, Province> {
        self.provinces.view()
    }

    pub fn localities(&self) -> StoreView<'_, Locality> {
        self.localities.view()
    }

    pub fn addresses(&self) -> StoreView<'_, Address> {
        self.addresses.view()
    }

    pub fn branches(&self) -> StoreView<'_, Branch> {
        self.branches.view()
    }

    pub fn companies(&self) -> StoreView<'_, Company> {
        self.companies.view()
    }

    pub fn add_country(&self, country: Country) -> DirectoryResult<Country> {
        Ok(self.countries.insert(country)?)
    }

    pub fn add_province(&self, province: Province) -> DirectoryResult<Province> {
        require_parent(&self.countries, province.country_id)?;
        Ok(self.provinces.insert(province)?)
    }

    pub fn add_locality(&self, locality: Locality) -> DirectoryResult<Locality> {
        require_parent(&self.provinces, locality.province_id)?;
        Ok(self.localities.insert(locality)?)
    }

    pub fn add_address(&self, address: Address) -> DirectoryResult<Address> {
        require_parent(&self.localities, address.locality_id)?;
        Ok(self.addresses.insert(address)?)
    }

    /// Stores a branch after validating hours and its address/company links.
    pub fn add_branch(&self, branch: Branch) -> DirectoryResult<Branch> {
        branch.validate()?;
        require_parent(&self.addresses, branch.address_id)?;
        if let Some(company_id) = branch.company_id {
            require_parent(&self.companies, company_id)?;
        }
        Ok(self.branches.insert(branch)?)
    }

    pub fn add_company(&self, company: Company) -> DirectoryResult<Company> {
        Ok(self.companies.insert(company)?)
    }

    /// Links a stored branch to a stored company.
    ///
    /// Re-assigning moves the branch; the previous company keeps no record of
    /// it because company membership is derived from `Branch::company_id`.
    pub fn assign_branch(
        &self,
        branch_id: EntityId,
        company_id: EntityId,
    ) -> DirectoryResult<Branch> {
        require_existing(&self.companies, company_id)?;
        let mut branch = self
            .branches
            .find_by_id(branch_id)?
            .ok_or(DirectoryError::NotFound {
                kind: Branch::KIND,
                id: branch_id,
            })?;

        branch.company_id = Some(company_id);
        self.branches
            .update(branch_id, branch)?
            .ok_or(DirectoryError::NotFound {
                kind: Branch::KIND,
                id: branch_id,
            })
    }

    pub fn provinces_of(&self, country_id: EntityId) -> DirectoryResult<Vec<Province>> {
        Ok(self
            .provinces
            .find_by_field("country_id", &FieldValue::Id(country_id))?)
    }

    pub fn localities_of(&self, province_id: EntityId) -> DirectoryResult<Vec<Locality>> {
        Ok(self
            .localities
            .find_by_field("province_id", &FieldValue::Id(province_id))?)
    }

    pub fn branches_of(&self, company_id: EntityId) -> DirectoryResult<Vec<Branch>> {
        Ok(self
            .branches
            .find_by_field("company_id", &FieldValue::Id(company_id))?)
    }

    /// Returns the lowest-id head office branch of a company, if any.
    pub fn head_office_of(&self, company_id: EntityId) -> DirectoryResult<Option<Branch>> {
        Ok(self
            .branches
            .find_by(|branch| branch.company_id == Some(company_id) && branch.is_head_office)?
            .into_iter()
            .next())
    }

    /// Renders an address with its locality, province and country names.
    ///
    /// Returns `None` when the address or any ancestor is missing.
    pub fn full_address(&self, address_id: EntityId) -> DirectoryResult<Option<String>> {
        let Some(address) = self.addresses.find_by_id(address_id)? else {
            return Ok(None);
        };
        let Some(locality) = self.localities.find_by_id(address.locality_id)? else {
            return Ok(None);
        };
        let Some(province) = self.provinces.find_by_id(locality.province_id)? else {
            return Ok(None);
        };
        let Some(country) = self.countries.find_by_id(province.country_id)? else {
            return Ok(None);
        };

        Ok(Some(format!(
            "{} {}, {}, {}, {} (CP {})",
            address.street,
            address.number,
            locality.name,
            province.name,
            country.name,
            address.postal_code
        )))
    }

    /// Replaces the CUIL of a stored company.
    pub fn update_company_cuil(
        &self,
        company_id: EntityId,
        cuil: i64,
    ) -> DirectoryResult<Option<Company>> {
        let Some(mut company) = self.companies.find_by_id(company_id)? else {
            return Ok(None);
        };
        company.cuil = cuil;
        Ok(self.companies.update(company_id, company)?)
    }

    /// Removes a country that no province references.
    ///
    /// # Errors
    /// - `HasDependents` while any province points at `country_id`.
    pub fn remove_country(&self, country_id: EntityId) -> DirectoryResult<Option<Country>> {
        remove_unreferenced(&self.countries, &self.provinces, "country_id", country_id)
    }

    /// Removes a province that no locality references.
    pub fn remove_province(&self, province_id: EntityId) -> DirectoryResult<Option<Province>> {
        remove_unreferenced(&self.provinces, &self.localities, "province_id", province_id)
    }

    /// Removes a locality that no address references.
    pub fn remove_locality(&self, locality_id: EntityId) -> DirectoryResult<Option<Locality>> {
        remove_unreferenced(&self.localities, &self.addresses, "locality_id", locality_id)
    }

    /// Removes an address that no branch references.
    pub fn remove_address(&self, address_id: EntityId) -> DirectoryResult<Option<Address>> {
        remove_unreferenced(&self.addresses, &self.branches, "address_id", address_id)
    }

    /// Removes a branch. Branches are leaves, so nothing can dangle.
    pub fn remove_branch(&self, branch_id: EntityId) -> DirectoryResult<Option<Branch>> {
        Ok(self.branches.delete(branch_id)?)
    }

    /// Detaches every branch of a company, then deletes the company.
    pub fn remove_company(&self, company_id: EntityId) -> DirectoryResult<Option<Company>> {
        if !self.companies.contains(company_id)? {
            return Ok(None);
        }

        for mut branch in self.branches_of(company_id)? {
            let Some(branch_id) = branch.id else {
                continue;
            };
            branch.company_id = None;
            if self.branches.update(branch_id, branch)?.is_none() {
                warn!(
                    "event=branch_detach_skipped module=service company_id={company_id} branch_id={branch_id}"
                );
            }
        }

        let removed = self.companies.delete(company_id)?;
        if removed.is_some() {
            info!("event=company_removed module=service company_id={company_id}");
        }
        Ok(removed)
    }
}

fn remove_unreferenced<P: Entity, C: Entity>(
    parents: &InMemoryEntityStore<P>,
    children: &InMemoryEntityStore<C>,
    foreign_key: &str,
    id: EntityId,
) -> DirectoryResult<Option<P>> {
    let dependents = children.find_by_field(foreign_key, &FieldValue::Id(id))?;
    if !dependents.is_empty() {
        warn!(
            "event=remove_refused module=service kind={} id={id} dependents={}",
            P::KIND,
            dependents.len()
        );
        return Err(DirectoryError::HasDependents {
            kind: P::KIND,
            id,
            dependent_kind: C::KIND,
            count: dependents.len(),
        });
    }

    Ok(parents.delete(id)?)
}

fn require_parent<T: Entity>(
    store: &InMemoryEntityStore<T>,
    id: EntityId,
) -> DirectoryResult<()> {
    if store.contains(id)? {
        Ok(())
    } else {
        Err(DirectoryError::MissingParent { kind: T::KIND, id })
    }
}

fn require_existing<T: Entity>(
    store: &InMemoryEntityStore<T>,
    id: EntityId,
) -> DirectoryResult<()> {
    if store.contains(id)? {
        Ok(())
    } else {
        Err(DirectoryError::NotFound { kind: T::KIND, id })
    }
}

#[cfg(test)]
mod tests {
    use super::{BusinessDirectory, DirectoryError};
    use crate::model::business::{
        Address, Branch, Company, Country, Locality, Province, TimeOfDay,
    };
    use crate::model::entity::EntityId;

    fn directory() -> BusinessDirectory {
        BusinessDirectory::try_new().expect("business schemas should be valid")
    }

    fn time(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).expect("fixture time should be valid")
    }

    fn id_of(id: Option<EntityId>) -> EntityId {
        id.expect("stored record should have id")
    }

    /// Country → province → locality → address chain, returned as ids.
    fn address_chain(directory: &BusinessDirectory) -> [EntityId; 4] {
        let country = directory
            .add_country(Country::new("Argentina"))
            .expect("country insert should succeed");
        let province = directory
            .add_province(Province::new("Córdoba", id_of(country.id)))
            .expect("province insert should succeed");
        let locality = directory
            .add_locality(Locality::new("Villa Carlos Paz", id_of(province.id)))
            .expect("locality insert should succeed");
        let address = directory
            .add_address(Address::new("Av. San Martín", 300, 5152, id_of(locality.id)))
            .expect("address insert should succeed");
        [
            id_of(country.id),
            id_of(province.id),
            id_of(locality.id),
            id_of(address.id),
        ]
    }

    #[test]
    fn child_insert_requires_parent() {
        let directory = directory();
        let err = directory
            .add_province(Province::new("Orphan", 7))
            .expect_err("province without country should be rejected");
        assert_eq!(
            err,
            DirectoryError::MissingParent {
                kind: "country",
                id: 7
            }
        );
        assert_eq!(directory.provinces().count(), Ok(0));
    }

    #[test]
    fn full_address_walks_every_ancestor() {
        let directory = directory();
        let country = directory
            .add_country(Country::new("Argentina"))
            .expect("country insert should succeed");
        let province = directory
            .add_province(Province::new("Buenos Aires", id_of(country.id)))
            .expect("province insert should succeed");
        let locality = directory
            .add_locality(Locality::new("La Plata", id_of(province.id)))
            .expect("locality insert should succeed");
        let address = directory
            .add_address(Address::new("Calle 50", 200, 1900, id_of(locality.id)))
            .expect("address insert should succeed");

        let rendered = directory
            .full_address(id_of(address.id))
            .expect("address walk should succeed");
        assert_eq!(
            rendered.as_deref(),
            Some("Calle 50 200, La Plata, Buenos Aires, Argentina (CP 1900)")
        );
        assert_eq!(directory.full_address(99), Ok(None));
    }

    #[test]
    fn assign_branch_rejects_unknown_company() {
        let directory = directory();
        let [_, _, _, address_id] = address_chain(&directory);
        let branch = directory
            .add_branch(Branch::new("Sucursal4", time(8, 30), time(17, 30), address_id))
            .expect("branch insert should succeed");

        let err = directory
            .assign_branch(id_of(branch.id), 1)
            .expect_err("unknown company should be rejected");
        assert_eq!(err, DirectoryError::NotFound { kind: "company", id: 1 });

        let company = directory
            .add_company(Company::new("Empresa2", "Empresa Dos SA", 27300987654))
            .expect("company insert should succeed");
        let assigned = directory
            .assign_branch(id_of(branch.id), id_of(company.id))
            .expect("assignment should succeed");
        assert_eq!(assigned.company_id, company.id);
    }

    #[test]
    fn remove_country_refuses_while_provinces_reference_it() {
        let directory = directory();
        let [country_id, province_id, locality_id, address_id] = address_chain(&directory);

        assert_eq!(
            directory.remove_country(country_id),
            Err(DirectoryError::HasDependents {
                kind: "country",
                id: country_id,
                dependent_kind: "province",
                count: 1
            })
        );
        assert_eq!(directory.countries().contains(country_id), Ok(true));

        for removed in [
            directory.remove_address(address_id).map(|found| found.is_some()),
            directory.remove_locality(locality_id).map(|found| found.is_some()),
            directory.remove_province(province_id).map(|found| found.is_some()),
            directory.remove_country(country_id).map(|found| found.is_some()),
        ] {
            assert_eq!(removed, Ok(true));
        }
        assert_eq!(directory.countries().count(), Ok(0));
        assert_eq!(directory.remove_country(country_id), Ok(None));
    }

    #[test]
    fn remove_province_refuses_while_localities_reference_it() {
        let directory = directory();
        let [country_id, province_id, _, _] = address_chain(&directory);

        let err = directory
            .remove_province(province_id)
            .expect_err("referenced province should stay");
        assert!(matches!(
            err,
            DirectoryError::HasDependents {
                dependent_kind: "locality",
                ..
            }
        ));
        assert_eq!(directory.provinces_of(country_id).map(|found| found.len()), Ok(1));
    }

    #[test]
    fn remove_locality_refuses_while_addresses_reference_it() {
        let directory = directory();
        let [_, _, locality_id, _] = address_chain(&directory);

        let err = directory
            .remove_locality(locality_id)
            .expect_err("referenced locality should stay");
        assert!(matches!(
            err,
            DirectoryError::HasDependents {
                kind: "locality",
                dependent_kind: "address",
                count: 1,
                ..
            }
        ));
        assert_eq!(directory.localities().contains(locality_id), Ok(true));
    }

    #[test]
    fn remove_address_refuses_until_its_branch_is_removed() {
        let directory = directory();
        let [_, _, _, address_id] = address_chain(&directory);
        let branch = directory
            .add_branch(Branch::new("Sucursal4", time(8, 30), time(17, 30), address_id))
            .expect("branch insert should succeed");

        let err = directory
            .remove_address(address_id)
            .expect_err("referenced address should stay");
        assert!(matches!(
            err,
            DirectoryError::HasDependents {
                dependent_kind: "branch",
                ..
            }
        ));

        let removed = directory
            .remove_branch(id_of(branch.id))
            .expect("branch removal should succeed");
        assert_eq!(removed.map(|branch| branch.name), Some("Sucursal4".to_string()));
        assert_eq!(directory.remove_branch(id_of(branch.id)), Ok(None));

        let address = directory
            .remove_address(address_id)
            .expect("unreferenced address should be removable");
        assert_eq!(address.and_then(|address| address.id), Some(address_id));
        assert_eq!(directory.full_address(address_id), Ok(None));
    }

    #[test]
    fn remove_company_of_unknown_id_touches_no_branch() {
        let directory = directory();
        let [_, _, _, address_id] = address_chain(&directory);
        let company = directory
            .add_company(Company::new("Empresa1", "Empresa Uno SA", 20301234567))
            .expect("company insert should succeed");
        let mut branch = Branch::new("Sucursal1", time(9, 0), time(18, 0), address_id);
        branch.company_id = company.id;
        let branch = directory
            .add_branch(branch)
            .expect("branch insert should succeed");

        assert_eq!(directory.remove_company(99), Ok(None));
        let kept = directory
            .branches()
            .find_by_id(id_of(branch.id))
            .expect("lookup should succeed")
            .expect("branch should still exist");
        assert_eq!(kept.company_id, company.id);
    }
}
