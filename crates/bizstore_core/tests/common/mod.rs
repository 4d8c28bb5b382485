//! Sample business directory shared by integration tests.

#![allow(dead_code)]

use bizstore_core::{
    Address, Branch, BusinessDirectory, Company, Country, EntityId, Locality, Province, TimeOfDay,
};

/// Ids of the records loaded by [`sample_directory`].
pub struct SampleIds {
    pub argentina: EntityId,
    pub buenos_aires: EntityId,
    pub cordoba: EntityId,
    pub caba: EntityId,
    pub la_plata: EntityId,
    pub cordoba_capital: EntityId,
    pub villa_carlos_paz: EntityId,
    pub addresses: [EntityId; 4],
    pub branches: [EntityId; 4],
    pub empresa1: EntityId,
    pub empresa2: EntityId,
}

pub fn time(hour: u8, minute: u8) -> TimeOfDay {
    TimeOfDay::new(hour, minute).expect("fixture time should be a valid time of day")
}

/// Argentina, two provinces, four localities, four branches, two companies.
pub fn sample_directory() -> (BusinessDirectory, SampleIds) {
    let directory = BusinessDirectory::try_new().expect("business schemas should be valid");

    let argentina = stored_id(
        directory
            .add_country(Country::new("Argentina"))
            .expect("country insert should succeed")
            .id,
    );
    let buenos_aires = stored_id(
        directory
            .add_province(Province::new("Buenos Aires", argentina))
            .expect("province insert should succeed")
            .id,
    );
    let cordoba = stored_id(
        directory
            .add_province(Province::new("Córdoba", argentina))
            .expect("province insert should succeed")
            .id,
    );

    let caba = add_locality(&directory, "CABA", buenos_aires);
    let la_plata = add_locality(&directory, "La Plata", buenos_aires);
    let cordoba_capital = add_locality(&directory, "Córdoba Capital", cordoba);
    let villa_carlos_paz = add_locality(&directory, "Villa Carlos Paz", cordoba);

    let addresses = [
        ("Av. Corrientes", 1000, 1000, 1, caba),
        ("Calle 50", 200, 1900, 2, la_plata),
        ("Bv. San Juan", 500, 5000, 3, cordoba_capital),
        ("Av. San Martín", 300, 5152, 4, villa_carlos_paz),
    ]
    .map(|(street, number, postal_code, unit, locality_id)| {
        stored_id(
            directory
                .add_address(
                    Address::new(street, number, postal_code, locality_id).with_unit(unit, unit),
                )
                .expect("address insert should succeed")
                .id,
        )
    });

    let branch_specs = [
        ("Sucursal1 - CABA", time(9, 0), time(18, 0), true),
        ("Sucursal2 - La Plata", time(9, 0), time(18, 0), false),
        ("Sucursal3 - Córdoba Capital", time(8, 30), time(17, 30), true),
        ("Sucursal4 - Villa Carlos Paz", time(8, 30), time(17, 30), false),
    ];
    let mut branches = [0; 4];
    for (index, (name, opens, closes, head_office)) in branch_specs.into_iter().enumerate() {
        let mut branch = Branch::new(name, opens, closes, addresses[index]);
        branch.is_head_office = head_office;
        branches[index] = stored_id(
            directory
                .add_branch(branch)
                .expect("branch insert should succeed")
                .id,
        );
    }

    let empresa1 = stored_id(
        directory
            .add_company(Company::new("Empresa1", "Empresa Uno SRL", 20300123456))
            .expect("company insert should succeed")
            .id,
    );
    let empresa2 = stored_id(
        directory
            .add_company(Company::new("Empresa2", "Empresa Dos SA", 27300987654))
            .expect("company insert should succeed")
            .id,
    );

    for (branch_id, company_id) in [
        (branches[0], empresa1),
        (branches[1], empresa1),
        (branches[2], empresa2),
        (branches[3], empresa2),
    ] {
        directory
            .assign_branch(branch_id, company_id)
            .expect("branch assignment should succeed");
    }

    let ids = SampleIds {
        argentina,
        buenos_aires,
        cordoba,
        caba,
        la_plata,
        cordoba_capital,
        villa_carlos_paz,
        addresses,
        branches,
        empresa1,
        empresa2,
    };
    (directory, ids)
}

fn add_locality(directory: &BusinessDirectory, name: &str, province_id: EntityId) -> EntityId {
    stored_id(
        directory
            .add_locality(Locality::new(name, province_id))
            .expect("locality insert should succeed")
            .id,
    )
}

pub fn stored_id(id: Option<EntityId>) -> EntityId {
    id.expect("stored entities always carry an id")
}
