mod victim_dto;

pub use victim_dto::{
    AddVictimImagesDto, CreateVictimDto, DeleteAllResponseDto, ListVictimsQuery,
    UpdateDeathTypeDto, UpdateDetailsDto, VictimResponseDto,
};
